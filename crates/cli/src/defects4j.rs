use libdocs_bundle::{is_defects4j_checkout, BundleError, ProjectLayout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

const SOURCE_DIR_PROPERTY: &str = "dir.src.classes";
const CLASSPATH_PROPERTY: &str = "cp.compile";

pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(120);

/// Reads project properties through `defects4j export`
#[derive(Debug, Clone)]
pub struct Defects4jExporter {
    program: PathBuf,
    timeout: Duration,
}

impl Default for Defects4jExporter {
    fn default() -> Self {
        Self {
            program: PathBuf::from("defects4j"),
            timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }
}

impl Defects4jExporter {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// `defects4j export -p <property> -w <workdir>`, trimmed stdout on success
    pub async fn export(&self, property: &str, workdir: &Path) -> Result<String, BundleError> {
        let output = timeout(
            self.timeout,
            tokio::process::Command::new(&self.program)
                .arg("export")
                .arg("-p")
                .arg(property)
                .arg("-w")
                .arg(workdir)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            BundleError::export(
                property,
                format!("timed out after {}s", self.timeout.as_secs()),
            )
        })?
        .map_err(|e| BundleError::export(property, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() { stdout } else { stderr };
            return Err(BundleError::export(property, message));
        }
        Ok(stdout)
    }

    /// Source directory and compile classpath of a Defects4J working directory.
    ///
    /// A failing source directory export is fatal; a failing classpath export
    /// only disables external documentation.
    pub async fn layout(&self, workdir: &Path) -> Result<ProjectLayout, BundleError> {
        let workdir = std::path::absolute(workdir)?;
        if !is_defects4j_checkout(&workdir) {
            return Err(BundleError::NotACheckout(workdir));
        }

        let source_rel = self.export(SOURCE_DIR_PROPERTY, &workdir).await?;
        if source_rel.is_empty() {
            return Err(BundleError::SourceDirectory(workdir));
        }
        let classpath = match self.export(CLASSPATH_PROPERTY, &workdir).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("No compile classpath for {}: {e}", workdir.display());
                String::new()
            }
        };

        let source_dir = workdir.join(source_rel);
        Ok(ProjectLayout::new(&workdir, source_dir).with_classpath_str(&classpath))
    }
}
