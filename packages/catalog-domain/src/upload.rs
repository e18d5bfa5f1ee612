/// Names derived from an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName {
	/// Name as sent by the client, directories stripped.
	pub original: String,
	/// File name on disk: the stem with the normalized extension.
	pub stored: String,
	/// Key the reindexing service knows the file by: the lowercased stem.
	pub refresh_key: String,
}
impl UploadName {
	/// Returns `None` when the name has no usable stem.
	pub fn new(client_name: &str, extension: &str) -> Option<Self> {
		let original = client_name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
		let stem = file_stem(original);

		if stem.is_empty() || stem == "." || stem == ".." {
			return None;
		}

		Some(Self {
			original: original.to_string(),
			stored: format!("{stem}.{extension}"),
			refresh_key: stem.to_lowercase(),
		})
	}
}

// A leading dot starts a hidden name, not an extension.
fn file_stem(name: &str) -> &str {
	match name.rfind('.') {
		Some(0) | None => name,
		Some(index) => &name[..index],
	}
}
