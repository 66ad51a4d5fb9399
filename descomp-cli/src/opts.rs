use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn input_file(path: &str) -> Result<InputFile, String> {
    let result = InputFile {
        path: Path::new(path).to_path_buf(),
    };

    Ok(result)
}

impl InputFile {
    pub fn as_reader(&self) -> anyhow::Result<BufReader<File>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open {}", self.path.display()))?;
        Ok(BufReader::new(file))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
}

impl Display for OutputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn output_file(path: &str) -> Result<OutputFile, String> {
    let result = OutputFile {
        path: Path::new(path).to_path_buf(),
    };

    Ok(result)
}

impl OutputFile {
    pub fn as_writer(&self) -> anyhow::Result<BufWriter<File>> {
        let file = File::create(&self.path)
            .with_context(|| format!("Could not create {}", self.path.display()))?;
        Ok(BufWriter::new(file))
    }
}
