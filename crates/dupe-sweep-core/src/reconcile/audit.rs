use std::io::{self, Write};
use std::path::PathBuf;

/// What one removal run did to the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    pub kept: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl AuditLog {
    /// Plain-text sections: kept, removed, then errors only when there are any.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "Files kept (originals):")?;
        for path in &self.kept {
            writeln!(w, "{}", path.display())?;
        }

        writeln!(w)?;
        writeln!(w, "Files removed (duplicates):")?;
        for path in &self.removed {
            writeln!(w, "{}", path.display())?;
        }

        if !self.errors.is_empty() {
            writeln!(w)?;
            writeln!(w, "Errors encountered:")?;
            for error in &self.errors {
                writeln!(w, "{}", error)?;
            }
        }

        w.flush()
    }
}
