//! Single-stream HTTP GET into a staged file.

use std::io;
use std::path::Path;

use super::error::FetchError;
use crate::config::HttpConfig;
use crate::storage::StagedFile;

/// Downloads `url` to `destination` via `<destination>.part`. Returns bytes written.
/// On any failure the temp file is removed and `destination` is left untouched.
pub(super) fn get_to_file(url: &str, destination: &Path, http: &HttpConfig) -> Result<u64, FetchError> {
    let mut staged = StagedFile::create(destination, http.chunk_size)
        .map_err(|e| FetchError::storage(destination, e))?;
    match stream_body(url, &mut staged, http) {
        Ok(()) => staged
            .finalize(destination)
            .map_err(|e| FetchError::storage(destination, e)),
        Err(e) => {
            staged.discard();
            Err(e)
        }
    }
}

fn stream_body(url: &str, staged: &mut StagedFile, http: &HttpConfig) -> Result<(), FetchError> {
    let temp_path = staged.temp_path().to_path_buf();
    let mut storage_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.buffer_size(http.chunk_size)?;
    easy.connect_timeout(http.connect_timeout())?;
    // Abort stalled transfers rather than hang a worker forever.
    easy.low_speed_limit(http.low_speed_limit)?;
    easy.low_speed_time(http.low_speed_time())?;
    easy.timeout(http.timeout())?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match staged.write_chunk(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                storage_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(io_err) = storage_error.take() {
                return Err(FetchError::storage(temp_path, io_err));
            }
        }
        return Err(FetchError::Network(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(())
}
