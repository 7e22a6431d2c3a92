//! Key-value backends the document store writes its snapshots to.
//!
//! Two backends are provided:
//! - [`SqliteStorage`]: a single-table SQLite database, the durable default
//! - [`MemoryStorage`]: a shared in-memory map, handy in tests

use std::sync::atomic::{AtomicUsize, Ordering};

use rusqlite::{params, Connection, OptionalExtension};

use super::*;

/// A durable key-value store holding whole-collection snapshots.
pub trait Storage: Send {
  /// Returns the value stored under `key`, if any.
  fn load(&self, key: &str) -> Result<Option<String>>;

  /// Replaces the value stored under `key`.
  fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backed by a SQLite database file.
pub struct SqliteStorage {
  /// Open database connection
  conn: Connection,
}

impl SqliteStorage {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// Missing parent directories are created and the schema is initialized.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use studydeck::store::SqliteStorage;
  /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// // Open in a specific location
  /// let storage = SqliteStorage::open("studydeck.db")?;
  ///
  /// // Or use the default location
  /// let storage = SqliteStorage::open(SqliteStorage::default_path())?;
  /// # Ok(())
  /// # }
  /// ```
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    debug!("Opening storage at {}", path.display());
    Self::init(Connection::open(path)?)
  }

  /// Opens a private database that lives only as long as the value.
  pub fn in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

  /// Applies the schema to a fresh connection.
  fn init(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/init.sql")))?;
    Ok(Self { conn })
  }

  /// Returns the default path for the database file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/studydeck/studydeck.db`
  /// - On macOS: `~/Library/Application Support/studydeck/studydeck.db`
  /// - On Windows: `%APPDATA%\studydeck\studydeck.db`
  /// - Fallback: `./studydeck/studydeck.db`
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("studydeck").join("studydeck.db")
  }
}

impl Storage for SqliteStorage {
  fn load(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn
      .query_row("SELECT value FROM storage WHERE key = ?1", params![key], |row| row.get(0))
      .optional()?;
    Ok(value)
  }

  fn save(&mut self, key: &str, value: &str) -> Result<()> {
    self.conn.execute(
      "INSERT INTO storage (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET
         value = excluded.value,
         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
      params![key, value],
    )?;
    Ok(())
  }
}

/// In-memory storage. Clones share the same entries, so a store can be reopened on a clone
/// to observe what was persisted.
#[derive(Clone, Default)]
pub struct MemoryStorage {
  /// Stored snapshots by key
  entries: Arc<Mutex<BTreeMap<String, String>>>,
  /// Number of successful saves
  writes:  Arc<AtomicUsize>,
}

impl MemoryStorage {
  /// Creates empty storage.
  pub fn new() -> Self { Self::default() }

  /// The raw snapshot stored under `key`.
  pub fn get(&self, key: &str) -> Option<String> {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).get(key).cloned()
  }

  /// How many times any key has been written.
  pub fn write_count(&self) -> usize { self.writes.load(Ordering::SeqCst) }
}

impl Storage for MemoryStorage {
  fn load(&self, key: &str) -> Result<Option<String>> { Ok(self.get(key)) }

  fn save(&mut self, key: &str, value: &str) -> Result<()> {
    self
      .entries
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .insert(key.to_string(), value.to_string());
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}
