use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

/// Where a request comes from: a file or stdin.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub enum RequestSource {
    File(Utf8PathBuf),
    #[default]
    Stdin,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestSource::File(path) => write!(f, "{}", path),
            RequestSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl RequestSource {
    /// Create a source from a path, where "-" means stdin.
    pub fn from_path(path: Utf8PathBuf) -> Self {
        if path.as_str() == "-" {
            RequestSource::Stdin
        } else {
            RequestSource::File(path)
        }
    }

    pub fn reader(&self) -> Result<SourceReader> {
        match self {
            RequestSource::File(path) => {
                let file =
                    File::open(path).with_context(|| format!("failed to open file: {}", path))?;
                Ok(SourceReader::File(BufReader::new(file)))
            }
            RequestSource::Stdin => Ok(SourceReader::Stdin(BufReader::new(io::stdin()))),
        }
    }
}

/// A buffered reader over a [`RequestSource`].
pub enum SourceReader {
    File(BufReader<File>),
    Stdin(BufReader<io::Stdin>),
}

impl SourceReader {
    /// Read the whole source as one request.
    pub fn read_request(&mut self) -> Result<String> {
        let mut buf = String::new();
        match self {
            SourceReader::File(ref mut rdr) => rdr
                .read_to_string(&mut buf)
                .context("failed to read file")?,
            SourceReader::Stdin(ref mut rdr) => rdr
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?,
        };
        Ok(buf)
    }

    /// Call `f` for each non-blank line, one request per line.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped. Processing stops at
    /// the first error returned by `f`.
    pub fn for_each_request<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<()>,
    {
        let mut buf = String::with_capacity(1024);
        loop {
            buf.clear();
            let n = match self {
                SourceReader::File(ref mut rdr) => rdr.read_line(&mut buf),
                SourceReader::Stdin(ref mut rdr) => rdr.read_line(&mut buf),
            };
            let n = n.context("failed to read line")?;
            if n == 0 {
                break;
            }
            let line = buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            f(line)?;
        }
        Ok(())
    }
}
