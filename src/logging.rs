use std::fs::File;
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Routes `log` output to `path`; the terminal itself is busy drawing the game.
///
/// `LevelFilter::Off` skips logger setup entirely and creates no file.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> io::Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, File::create(path)?)
        .map_err(|error| io::Error::new(io::ErrorKind::AlreadyExists, error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use log::LevelFilter;

    use super::init_file_logger;

    #[test]
    fn disabled_logging_creates_no_file() {
        let path: PathBuf = std::env::temp_dir().join("snek-logging-disabled-test.log");
        let _ = std::fs::remove_file(&path);

        init_file_logger(&path, LevelFilter::Off).expect("off level is a no-op");

        assert!(!path.exists());
    }
}
