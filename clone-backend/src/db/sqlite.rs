//! SQLite connection pool and schema.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result as SqliteResult;

pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// `":memory:"` opens an in-memory database with the pool pinned to a
    /// single connection, so every checkout sees the same data (used by
    /// tests).
    pub fn new(path: &str) -> Result<Self, String> {
        let manager = if path == ":memory:" {
            SqliteConnectionManager::memory()
        } else {
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create database directory: {}", e))?;
            }
            SqliteConnectionManager::file(path)
        };
        let manager = manager.with_init(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        });

        let pool = if path == ":memory:" {
            Pool::builder().max_size(1).build(manager)
        } else {
            Pool::builder().build(manager)
        }
        .map_err(|e| format!("Failed to create connection pool: {}", e))?;

        let db = Self { pool };
        db.create_tables()
            .map_err(|e| format!("Failed to create tables: {}", e))?;
        Ok(db)
    }

    /// Check out a pooled connection.
    pub fn conn(&self) -> DbConn {
        self.pool.get().expect("Failed to get database connection")
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                telegram_id INTEGER NOT NULL UNIQUE,
                username TEXT,
                first_name TEXT,
                last_name TEXT,
                age INTEGER,
                city TEXT,
                gender TEXT,
                timezone TEXT,
                language_code TEXT,
                onboarding_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
            );

            CREATE TABLE IF NOT EXISTS clones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                personality_profile TEXT NOT NULL DEFAULT '{}',
                accuracy_score REAL NOT NULL DEFAULT 0,
                diaries_count INTEGER NOT NULL DEFAULT 0,
                total_words_analyzed INTEGER NOT NULL DEFAULT 0,
                last_diary_at TEXT,
                status TEXT NOT NULL DEFAULT 'creating',
                training_stage TEXT NOT NULL DEFAULT 'initial',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_clones_user ON clones(user_id);

            CREATE TABLE IF NOT EXISTS diaries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                clone_id INTEGER NOT NULL REFERENCES clones(id) ON DELETE CASCADE,
                content_text TEXT NOT NULL,
                audio_file_path TEXT,
                audio_duration_seconds INTEGER,
                word_count INTEGER NOT NULL,
                analysis_result TEXT,
                analyzed_at TEXT,
                analysis_version TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_diaries_user ON diaries(user_id);
            CREATE INDEX IF NOT EXISTS idx_diaries_clone ON diaries(clone_id);

            CREATE TABLE IF NOT EXISTS clone_memories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                clone_id INTEGER NOT NULL REFERENCES clones(id) ON DELETE CASCADE,
                source_diary_id INTEGER REFERENCES diaries(id) ON DELETE SET NULL,
                memory_type TEXT NOT NULL,
                memory_content TEXT NOT NULL,
                memory_context TEXT,
                importance_score REAL NOT NULL DEFAULT 0.5,
                confidence_score REAL NOT NULL DEFAULT 0.5,
                usage_count INTEGER NOT NULL DEFAULT 0,
                last_used_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_memories_clone ON clone_memories(clone_id);",
        )?;
        Ok(())
    }
}
