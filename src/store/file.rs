//! File-backed [`TokenStore`] holding the raw token response.

// std
use std::{
	ffi::OsString,
	fs::{self, DirBuilder, OpenOptions},
	io::{ErrorKind, Write},
};
#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
// self
use crate::{
	_prelude::*,
	auth::StoredToken,
	store::{StoreError, StoreFuture, TokenStore},
};

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Persists the token endpoint's JSON body verbatim at a single path.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over the target, so
/// readers observe either the previous payload or the new one. Missing parent directories
/// are created owner-only.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
}
impl FileStore {
	/// Creates a store for `path`. Nothing is touched on disk until the first write.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Target file path.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn tmp_path(&self) -> PathBuf {
		let mut tmp = OsString::from(self.path.as_os_str());

		tmp.push(".tmp");

		PathBuf::from(tmp)
	}

	fn read_now(&self) -> Result<Option<StoredToken>, StoreError> {
		let raw = match fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", self.path.display()),
				}),
		};

		Ok(Some(StoredToken::from_json(raw)?))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			if parent.exists() {
				return Ok(());
			}

			let mut builder = DirBuilder::new();

			builder.recursive(true);

			#[cfg(unix)]
			builder.mode(DIR_MODE);

			builder.create(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn write_now(&self, token: &StoredToken) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let tmp_path = self.tmp_path();
		let result = self.write_tmp_and_swap(&tmp_path, token.raw().as_bytes());

		if result.is_err() {
			let _ = fs::remove_file(&tmp_path);
		}

		result
	}

	fn write_tmp_and_swap(&self, tmp_path: &Path, contents: &[u8]) -> Result<(), StoreError> {
		{
			let mut options = OpenOptions::new();

			options.write(true).create(true).truncate(true);

			#[cfg(unix)]
			options.mode(FILE_MODE);

			let mut file = options.open(tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(contents).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn read(&self) -> StoreFuture<'_, Option<StoredToken>> {
		Box::pin(async move { self.read_now() })
	}

	fn write(&self, token: StoredToken) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.write_now(&token) })
	}

	fn location(&self) -> String {
		self.path.display().to_string()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::TokenFormatError;

	fn temp_dir() -> PathBuf {
		let unique = format!(
			"api_token_broker_file_store_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn token(raw: &str) -> StoredToken {
		StoredToken::from_json(raw).expect("Token fixture should parse.")
	}

	#[test]
	fn missing_file_reads_as_none() {
		let store = FileStore::new(temp_dir().join("absent.json"));
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		assert!(rt.block_on(store.read()).expect("Reading a missing file should succeed.").is_none());
	}

	#[test]
	fn write_creates_private_parents_and_overwrites() {
		let dir = temp_dir();
		let path = dir.join("nested").join("token.json");
		let store = FileStore::new(&path);
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let first = "{\"access_token\":\"first\",\"expires_in\":3599}";
		let second = "{\"access_token\":\"second\"}";

		rt.block_on(store.write(token(first))).expect("First write should succeed.");

		assert_eq!(fs::read_to_string(&path).expect("Token file should exist."), first);

		rt.block_on(store.write(token(second))).expect("Second write should succeed.");

		assert_eq!(fs::read_to_string(&path).expect("Token file should exist."), second);
		assert!(!store.tmp_path().exists());

		let fetched = rt
			.block_on(store.read())
			.expect("Reading the token file should succeed.")
			.expect("Token file should hold a token.");

		assert_eq!(fetched.access_token().expose(), "second");

		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;

			let parent_mode = fs::metadata(path.parent().expect("Token path should have a parent."))
				.expect("Parent directory should exist.")
				.permissions()
				.mode();
			let file_mode = fs::metadata(&path).expect("Token file should exist.").permissions().mode();

			assert_eq!(parent_mode & 0o777, DIR_MODE);
			assert_eq!(file_mode & 0o777, FILE_MODE);
		}

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn unusable_payloads_surface_as_format_errors() {
		let dir = temp_dir();
		let path = dir.join("token.json");
		let store = FileStore::new(&path);
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		fs::create_dir_all(&dir).expect("Temporary directory should be created.");
		fs::write(&path, "{\"foo\":\"bar\"}").expect("Fixture file should be written.");

		let err = rt.block_on(store.read()).expect_err("Payload without access_token should fail.");

		assert!(matches!(err, StoreError::Format(TokenFormatError::MissingAccessToken)));

		fs::write(&path, "not json").expect("Fixture file should be written.");

		let err = rt.block_on(store.read()).expect_err("Non-JSON payload should fail.");

		assert!(matches!(err, StoreError::Format(TokenFormatError::Malformed { .. })));

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}
