//! Source file discovery and output.
use log::{debug, error, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    compile::Compilation,
    config::CompilerConf,
    constants::OUTPUT_EXTENSION,
    error::{JackError, JackResult},
    library::Library,
};

/// Compiles source files to VM files according to a configuration.
pub struct Driver {
    conf: CompilerConf,
    library: Library,
}

/// Outcome of compiling a file or directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, in the order they were compiled.
    pub compiled: Vec<PathBuf>,
    /// Files skipped for not having the source extension.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, JackError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Driver {
    /// Create a driver, loading the configured library descriptor.
    pub fn new(conf: CompilerConf) -> JackResult<Self> {
        let library = Library::load(conf.library.as_deref())?;
        Ok(Self::with_library(conf, library))
    }

    pub fn with_library(conf: CompilerConf, library: Library) -> Self {
        Self { conf, library }
    }

    #[inline]
    pub fn config(&self) -> &CompilerConf {
        &self.conf
    }

    #[inline]
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Read and compile a source file without writing any output.
    pub fn compile_source(&self, path: &Path) -> JackResult<Compilation> {
        if !self.conf.is_source_file(path) {
            return Err(JackError::Extension {
                path: path.display().to_string(),
            });
        }

        let file_bytes = fs::read(path)?;
        let source_code = String::from_utf8(file_bytes)?;
        crate::compile_str(source_code, &self.library)
    }

    /// Compile a source file and write the VM file.
    ///
    /// Returns the path of the written file.
    pub fn compile_file(&self, path: &Path) -> JackResult<PathBuf> {
        debug!("compiling {}", path.display());
        let compilation = self.compile_source(path)?;
        let output = self.output_path(path);
        write_output(&output, &compilation)?;
        info!("{} -> {}", path.display(), output.display());
        Ok(output)
    }

    /// Compile every source file in a directory, in name order.
    ///
    /// Files with other extensions are skipped. A failed file doesn't stop
    /// the batch unless `fail_fast` is set.
    pub fn compile_dir(&self, dir: &Path) -> JackResult<BatchReport> {
        let mut paths = vec![];
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = BatchReport::default();
        for path in paths {
            if !self.compile_into(path, &mut report) && self.conf.fail_fast {
                break;
            }
        }

        Ok(report)
    }

    /// Compile a single file or a whole directory.
    pub fn compile_path(&self, path: &Path) -> JackResult<BatchReport> {
        if path.is_dir() {
            self.compile_dir(path)
        } else {
            let mut report = BatchReport::default();
            self.compile_into(path.to_path_buf(), &mut report);
            Ok(report)
        }
    }

    /// Compile one file of a batch, recording the outcome.
    ///
    /// Returns false when the file failed to compile.
    fn compile_into(&self, path: PathBuf, report: &mut BatchReport) -> bool {
        if !self.conf.is_source_file(&path) {
            warn!("skipping {}, expected a .{} file", path.display(), self.conf.extension);
            report.skipped.push(path);
            return true;
        }

        match self.compile_file(&path) {
            Ok(output) => {
                report.compiled.push(output);
                true
            }
            Err(err) => {
                error!("{}: {}", path.display(), err);
                report.failed.push((path, err));
                false
            }
        }
    }

    /// Where the VM file for the given source is written.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let output = source.with_extension(OUTPUT_EXTENSION);
        match (&self.conf.output_dir, output.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => output,
        }
    }
}

/// Write generated code, one instruction per line.
pub fn write_output(path: &Path, compilation: &Compilation) -> JackResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, compilation.render())?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    /// Fresh scratch directory for one test.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jackc-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const MAIN: &str = "class Main { function void main() { return; } }";
    const BROKEN: &str = "class Broken { function void main() { let x = 1; return; } }";

    #[test]
    fn test_output_path() {
        let driver = Driver::new(CompilerConf::default()).unwrap();
        assert_eq!(driver.output_path(Path::new("src/Main.jack")), PathBuf::from("src/Main.vm"));

        let conf = CompilerConf {
            output_dir: Some(PathBuf::from("build")),
            ..CompilerConf::default()
        };
        let driver = Driver::new(conf).unwrap();
        assert_eq!(driver.output_path(Path::new("src/Main.jack")), PathBuf::from("build/Main.vm"));
    }

    #[test]
    fn test_compile_file() {
        let dir = scratch_dir("file");
        let source = dir.join("Main.jack");
        fs::write(&source, MAIN).unwrap();

        let driver = Driver::new(CompilerConf::default()).unwrap();
        let output = driver.compile_file(&source).unwrap();
        assert_eq!(output, dir.join("Main.vm"));
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "function Main.main 0\npush constant 0\nreturn\n"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_wrong_extension() {
        let driver = Driver::new(CompilerConf::default()).unwrap();
        let result = driver.compile_source(Path::new("Main.txt"));
        assert!(matches!(result, Err(JackError::Extension { .. })));
    }

    #[test]
    fn test_compile_dir() {
        let dir = scratch_dir("dir");
        fs::write(dir.join("Main.jack"), MAIN).unwrap();
        fs::write(dir.join("Broken.jack"), BROKEN).unwrap();
        fs::write(dir.join("notes.txt"), "not jack").unwrap();

        let driver = Driver::new(CompilerConf::default()).unwrap();
        let report = driver.compile_dir(&dir).unwrap();

        assert_eq!(report.compiled, vec![dir.join("Main.vm")]);
        assert_eq!(report.skipped, vec![dir.join("notes.txt")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.join("Broken.jack"));
        assert!(report.failed[0].1.is_source_error());
        assert!(!report.is_success());
        assert!(!dir.join("Broken.vm").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fail_fast() {
        let dir = scratch_dir("fail-fast");
        // Broken sorts before Main.
        fs::write(dir.join("Broken.jack"), BROKEN).unwrap();
        fs::write(dir.join("Main.jack"), MAIN).unwrap();

        let conf = CompilerConf {
            fail_fast: true,
            ..CompilerConf::default()
        };
        let report = Driver::new(conf).unwrap().compile_dir(&dir).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert!(report.compiled.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
