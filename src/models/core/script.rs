use std::path::Path;

/// Script kinds the launcher can run, identified by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLanguage {
	PowerShell,
	Bash,
	Python,
	JavaScript,
}

impl ScriptLanguage {
	/// Detects the language from the extension of `path` (case-insensitive).
	pub fn from_path(path: &Path) -> Option<Self> {
		let extension = path.extension()?.to_str()?.to_lowercase();
		match extension.as_str() {
			"ps1" => Some(Self::PowerShell),
			"sh" => Some(Self::Bash),
			"py" => Some(Self::Python),
			"js" => Some(Self::JavaScript),
			_ => None,
		}
	}
}
