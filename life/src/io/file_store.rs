//! Board storage on the local filesystem.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/
//! ├── sequence      last allocated board id
//! ├── 1.json        board record
//! └── 2.json
//! ```
//!
//! Every write goes to a temp file first and is renamed into place, so a
//! reader sees either the previous record or the new one.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use jsonschema::{Validator, validator_for};
use serde_json::Value;
use tracing::debug;

use crate::core::types::{Board, BoardId, Grid};
use crate::io::store::{BoardStore, StoreError};

const BOARD_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/board/v1.schema.json"
));
const SEQUENCE_FILE: &str = "sequence";

pub struct FileStore {
    root: PathBuf,
    schema: Validator,
    /// Last allocated id. Held for the duration of every write so temp files
    /// never collide.
    sequence: Mutex<u64>,
}

impl FileStore {
    /// Open (or initialize) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| StoreError::io("create store directory", &root, err))?;
        let schema = compile_schema()?;
        let sequence = load_sequence(&root.join(SEQUENCE_FILE))?;
        debug!(root = %root.display(), sequence, "opened board store");
        Ok(Self {
            root,
            schema,
            sequence: Mutex::new(sequence),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: BoardId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        // The guarded value is only replaced after its file write succeeds.
        self.sequence
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_record(&self, id: BoardId, board: &Board) -> Result<(), StoreError> {
        let path = self.record_path(id);
        let buf = serde_json::to_string(board).map_err(|source| StoreError::Serialize {
            context: format!("serialize board {id}"),
            source,
        })?;
        write_atomic(&path, &buf)?;
        debug!(%id, generation = board.generation, is_final = board.is_final, "wrote board record");
        Ok(())
    }

    fn validate_record(&self, id: BoardId, value: &Value) -> Result<(), StoreError> {
        if self.schema.is_valid(value) {
            return Ok(());
        }
        let messages = self
            .schema
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        Err(StoreError::Corrupt {
            record: format!("board {id}"),
            message: messages.join("; "),
        })
    }
}

impl BoardStore for FileStore {
    fn create(&self, cells: Grid) -> Result<BoardId, StoreError> {
        let mut sequence = self.lock();
        let next = *sequence + 1;
        // Persist the sequence before the record: a failed record write burns
        // the id instead of handing it out twice.
        write_atomic(&self.root.join(SEQUENCE_FILE), &next.to_string())?;
        *sequence = next;

        let id = BoardId(next);
        self.write_record(id, &Board::new(cells))?;
        Ok(id)
    }

    fn get(&self, id: BoardId) -> Result<Board, StoreError> {
        let path = self.record_path(id);
        debug!(%id, path = %path.display(), "loading board record");
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(err) => return Err(StoreError::io("read board record", &path, err)),
        };
        let value: Value = serde_json::from_str(&contents).map_err(|err| StoreError::Corrupt {
            record: format!("board {id}"),
            message: err.to_string(),
        })?;
        self.validate_record(id, &value)?;
        serde_json::from_value(value).map_err(|source| StoreError::Serialize {
            context: format!("deserialize board {id}"),
            source,
        })
    }

    fn save(&self, id: BoardId, board: &Board) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.write_record(id, board)
    }
}

fn compile_schema() -> Result<Validator, StoreError> {
    let value: Value = serde_json::from_str(BOARD_SCHEMA).map_err(|source| StoreError::Serialize {
        context: "parse board schema".to_string(),
        source,
    })?;
    validator_for(&value).map_err(|err| StoreError::Schema(err.to_string()))
}

fn load_sequence(path: &Path) -> Result<u64, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => contents
            .trim()
            .parse::<u64>()
            .map_err(|err| StoreError::Corrupt {
                record: format!("sequence {}", path.display()),
                message: err.to_string(),
            }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
        Err(err) => Err(StoreError::io("read sequence", path, err)),
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);
    fs::write(&tmp_path, contents).map_err(|err| StoreError::io("write temp file", &tmp_path, err))?;
    fs::rename(&tmp_path, path).map_err(|err| StoreError::io("replace", path, err))?;
    Ok(())
}
