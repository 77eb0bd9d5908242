//! SQLite store for channels, videos, users, comments and their media files.

use std::path::{Path, PathBuf};

use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use super::{RepositoryError, Result, Table};
use crate::models::{Channel, Comment, MediaFile, OwnerKind, User, Video, IMAGE_KIND};

/// Column/value pairs of one row to write.
pub type Row<'a> = [(&'a str, &'a dyn ToSql)];

/// Insert-only store over the crawl database.
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Open the database at `db_path`, creating the schema if needed.
    pub fn open(db_path: &Path) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS channels (
                channel_id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_name VARCHAR,
                channel_amount_followers VARCHAR,
                channel_link VARCHAR
            );

            CREATE TABLE IF NOT EXISTS videos (
                video_id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_name VARCHAR,
                video_link VARCHAR,
                video_views VARCHAR,
                video_likes VARCHAR,
                video_date VARCHAR,
                video_duration VARCHAR,
                channel_id INT REFERENCES channels(channel_id)
            );

            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_name VARCHAR,
                user_link VARCHAR
            );

            CREATE TABLE IF NOT EXISTS comments (
                comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                comment_text VARCHAR,
                comment_date VARCHAR,
                comment_likes VARCHAR,
                user_id INT REFERENCES users(user_id),
                video_id INT REFERENCES videos(video_id)
            );

            CREATE TABLE IF NOT EXISTS user_files (
                file_id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_type VARCHAR,
                file_path VARCHAR,
                user_id VARCHAR REFERENCES users(user_id)
            );

            CREATE TABLE IF NOT EXISTS video_files (
                file_id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_type VARCHAR,
                file_path VARCHAR,
                video_id VARCHAR REFERENCES videos(video_id)
            );

            CREATE TABLE IF NOT EXISTS channel_files (
                file_id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_type VARCHAR,
                file_path VARCHAR,
                channel_id VARCHAR REFERENCES channels(channel_id)
            );

            CREATE INDEX IF NOT EXISTS idx_channels_name ON channels(channel_name);
            CREATE INDEX IF NOT EXISTS idx_videos_link ON videos(video_link);
            CREATE INDEX IF NOT EXISTS idx_users_name ON users(user_name);
            CREATE INDEX IF NOT EXISTS idx_comments_video ON comments(video_id);
            CREATE INDEX IF NOT EXISTS idx_user_files_owner ON user_files(user_id);
            CREATE INDEX IF NOT EXISTS idx_video_files_owner ON video_files(video_id);
            CREATE INDEX IF NOT EXISTS idx_channel_files_owner ON channel_files(channel_id);
        "#,
        )?;
        Ok(())
    }

    /// Insert `row` unless a row with the same `key_columns` values exists,
    /// and return the id of the matching row either way.
    pub fn upsert_natural_key(&self, table: Table, key_columns: &[&str], row: &Row<'_>) -> Result<i64> {
        let conn = self.connect()?;
        Ok(upsert(&conn, table, key_columns, row)?.0)
    }

    /// Append `row` and return its id.
    pub fn insert_child(&self, table: Table, row: &Row<'_>) -> Result<i64> {
        let conn = self.connect()?;
        insert(&conn, table, row)
    }

    /// Record a media file for an owner that has none yet. Returns whether a
    /// row was written.
    pub fn attach_file_if_absent(
        &self,
        owner_kind: OwnerKind,
        owner_id: i64,
        kind: &str,
        path: &str,
    ) -> Result<bool> {
        let conn = self.connect()?;
        attach_file(&conn, owner_kind, owner_id, kind, path)
    }

    /// Media file recorded for an owner, if any.
    pub fn file_for(&self, owner_kind: OwnerKind, owner_id: i64) -> Result<Option<MediaFile>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT file_type, file_path FROM {} WHERE {} = ?1 ORDER BY file_id LIMIT 1",
            files_table(owner_kind),
            owner_kind.owner_column()
        );
        super::to_option(conn.query_row(&sql, [owner_id], |row| {
            Ok(MediaFile {
                kind: row.get("file_type")?,
                path_or_url: row.get("file_path")?,
                owner_id,
                owner_kind,
            })
        }))
    }

    /// Save a channel and its avatar. Returns the channel id.
    pub fn save_channel(&self, channel: &Channel) -> Result<i64> {
        let conn = self.connect()?;
        let (id, _) = upsert(
            &conn,
            Table::Channels,
            &["channel_name"],
            &[
                ("channel_name", &channel.name),
                ("channel_amount_followers", &channel.follower_count),
                ("channel_link", &channel.profile_url),
            ],
        )?;
        if !channel.avatar_url.is_empty() {
            attach_file(&conn, OwnerKind::Channel, id, IMAGE_KIND, &channel.avatar_url)?;
        }
        Ok(id)
    }

    /// Save a video of `channel_id` and its thumbnail. Returns the video id.
    pub fn save_video(&self, channel_id: i64, video: &Video) -> Result<i64> {
        let conn = self.connect()?;
        let (id, inserted) = upsert(
            &conn,
            Table::Videos,
            &["video_link"],
            &[
                ("video_name", &video.title),
                ("video_link", &video.url),
                ("video_views", &video.view_count),
                ("video_likes", &video.like_label),
                ("video_date", &video.published_label),
                ("video_duration", &video.duration),
                ("channel_id", &channel_id),
            ],
        )?;
        if !inserted {
            debug!("Video already stored: {}", video.url);
        }
        if !video.thumbnail_url.is_empty() {
            attach_file(&conn, OwnerKind::Video, id, IMAGE_KIND, &video.thumbnail_url)?;
        }
        Ok(id)
    }

    /// Save a user and their avatar. Returns the user id.
    pub fn save_user(&self, user: &User) -> Result<i64> {
        let conn = self.connect()?;
        save_user_in(&conn, user)
    }

    /// Save one page of comments of `video_id` in a single transaction,
    /// together with their authors. Returns the number of comments written.
    pub fn save_comments(&self, video_id: i64, comments: &[Comment]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        for comment in comments {
            let user_id = save_user_in(&tx, &comment.author)?;
            let date = comment.published.format("%Y-%m-%d").to_string();
            insert(
                &tx,
                Table::Comments,
                &[
                    ("comment_text", &comment.text),
                    ("comment_date", &date),
                    ("comment_likes", &comment.like_count),
                    ("user_id", &user_id),
                    ("video_id", &video_id),
                ],
            )?;
        }

        tx.commit()?;
        Ok(comments.len())
    }

    /// Row count of every table.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connect()?;
        let mut tables = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            tables.push((table, count));
        }
        Ok(StoreStats { tables })
    }
}

/// Per-table row counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub tables: Vec<(Table, i64)>,
}

impl StoreStats {
    pub fn count(&self, table: Table) -> i64 {
        self.tables
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

fn save_user_in(conn: &Connection, user: &User) -> Result<i64> {
    let (id, _) = upsert(
        conn,
        Table::Users,
        &["user_name"],
        &[("user_name", &user.display_name), ("user_link", &user.profile_ref)],
    )?;
    if !user.avatar_url.is_empty() {
        attach_file(conn, OwnerKind::User, id, IMAGE_KIND, &user.avatar_url)?;
    }
    Ok(id)
}

fn check_columns<'a>(table: Table, columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for column in columns {
        if !table.has_column(column) {
            return Err(RepositoryError::InvalidColumn {
                table: table.as_str(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn insert(conn: &Connection, table: Table, row: &Row<'_>) -> Result<i64> {
    check_columns(table, row.iter().map(|(c, _)| *c))?;

    let columns: Vec<&str> = row.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, params_from_iter(row.iter().map(|(_, v)| *v)))?;
    Ok(conn.last_insert_rowid())
}

/// Insert-if-absent on `key_columns`, then resolve the matching row's id.
/// Returns `(id, inserted)`.
fn upsert(conn: &Connection, table: Table, key_columns: &[&str], row: &Row<'_>) -> Result<(i64, bool)> {
    check_columns(table, row.iter().map(|(c, _)| *c))?;

    let mut key_values: Vec<&dyn ToSql> = Vec::with_capacity(key_columns.len());
    for key in key_columns {
        let value = row
            .iter()
            .find(|(c, _)| c == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| RepositoryError::InvalidColumn {
                table: table.as_str(),
                column: key.to_string(),
            })?;
        key_values.push(value);
    }

    let columns: Vec<&str> = row.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
    let key_match = |offset: usize| {
        key_columns
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{} = ?{}", k, offset + i + 1))
            .collect::<Vec<_>>()
            .join(" AND ")
    };

    let insert_sql = format!(
        "INSERT INTO {table} ({}) SELECT {} WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {})",
        columns.join(", "),
        placeholders.join(", "),
        key_match(row.len()),
    );
    let values = row.iter().map(|(_, v)| *v).chain(key_values.iter().copied());
    let inserted = conn.execute(&insert_sql, params_from_iter(values))? == 1;

    let select_sql = format!(
        "SELECT {id} FROM {table} WHERE {} ORDER BY {id} LIMIT 1",
        key_match(0),
        id = table.id_column(),
    );
    let id = conn.query_row(&select_sql, params_from_iter(key_values.iter().copied()), |r| {
        r.get(0)
    })?;

    Ok((id, inserted))
}

fn attach_file(
    conn: &Connection,
    owner_kind: OwnerKind,
    owner_id: i64,
    kind: &str,
    path: &str,
) -> Result<bool> {
    let table = files_table(owner_kind);
    let (_, inserted) = upsert(
        conn,
        table,
        &[owner_kind.owner_column()],
        &[
            ("file_type", &kind),
            ("file_path", &path),
            (owner_kind.owner_column(), &owner_id),
        ],
    )?;
    Ok(inserted)
}

fn files_table(owner_kind: OwnerKind) -> Table {
    match owner_kind {
        OwnerKind::Channel => Table::ChannelFiles,
        OwnerKind::Video => Table::VideoFiles,
        OwnerKind::User => Table::UserFiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn user(name: &str, avatar: &str) -> User {
        User {
            display_name: name.to_string(),
            profile_ref: format!("UC{}", name),
            avatar_url: avatar.to_string(),
        }
    }

    fn comment(text: &str, author: User) -> Comment {
        Comment {
            text: text.to_string(),
            published: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            like_count: "0".to_string(),
            author,
        }
    }

    fn video(url: &str) -> Video {
        Video {
            title: "Title".to_string(),
            url: url.to_string(),
            view_count: "10 views".to_string(),
            like_label: "1 like".to_string(),
            published_label: "Mar 1, 2024".to_string(),
            duration: "1:00".to_string(),
            thumbnail_url: "https://i.test/t.jpg".to_string(),
        }
    }

    #[test]
    fn test_upsert_returns_existing_id() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();

        let a = store
            .upsert_natural_key(Table::Users, &["user_name"], &[("user_name", &"alice"), ("user_link", &"a")])
            .unwrap();
        let b = store
            .upsert_natural_key(Table::Users, &["user_name"], &[("user_name", &"bob"), ("user_link", &"b")])
            .unwrap();
        let again = store
            .upsert_natural_key(Table::Users, &["user_name"], &[("user_name", &"alice"), ("user_link", &"other")])
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(again, a);
        assert_eq!(store.stats().unwrap().count(Table::Users), 2);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();

        let err = store
            .insert_child(Table::Comments, &[("comment_text", &"x"), ("rating", &5)])
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidColumn { column, .. } if column == "rating"));

        let err = store
            .upsert_natural_key(Table::Users, &["user_link"], &[("user_name", &"x")])
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidColumn { .. }));
    }

    #[test]
    fn test_attach_file_once_per_owner() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        let id = store.save_user(&user("alice", "")).unwrap();

        assert!(store.file_for(OwnerKind::User, id).unwrap().is_none());
        assert!(store.attach_file_if_absent(OwnerKind::User, id, IMAGE_KIND, "one.jpg").unwrap());
        assert!(!store.attach_file_if_absent(OwnerKind::User, id, IMAGE_KIND, "two.jpg").unwrap());
        assert_eq!(store.stats().unwrap().count(Table::UserFiles), 1);

        let file = store.file_for(OwnerKind::User, id).unwrap().unwrap();
        assert_eq!(file.path_or_url, "one.jpg");
        assert_eq!(file.kind, IMAGE_KIND);
        assert_eq!(file.owner_kind, OwnerKind::User);
    }

    #[test]
    fn test_save_channel_and_video_are_idempotent() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        let channel = Channel {
            name: "@chan".to_string(),
            follower_count: "1K subscribers".to_string(),
            profile_url: "https://x.test/@chan".to_string(),
            avatar_url: "https://i.test/a.jpg".to_string(),
        };

        let first = store.save_channel(&channel).unwrap();
        let v1 = store.save_video(first, &video("https://x.test/watch?v=1")).unwrap();
        let second = store.save_channel(&channel).unwrap();
        let v2 = store.save_video(second, &video("https://x.test/watch?v=1")).unwrap();

        assert_eq!(first, second);
        assert_eq!(v1, v2);
        let stats = store.stats().unwrap();
        assert_eq!(stats.count(Table::Channels), 1);
        assert_eq!(stats.count(Table::Videos), 1);
        assert_eq!(stats.count(Table::ChannelFiles), 1);
        assert_eq!(stats.count(Table::VideoFiles), 1);
    }

    #[test]
    fn test_save_comments_links_users() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = Store::open(&path).unwrap();
        let channel_id = store
            .save_channel(&Channel {
                name: "@chan".to_string(),
                follower_count: String::new(),
                profile_url: String::new(),
                avatar_url: String::new(),
            })
            .unwrap();
        let video_id = store.save_video(channel_id, &video("https://x.test/watch?v=1")).unwrap();

        let written = store
            .save_comments(
                video_id,
                &[
                    comment("first", user("alice", "https://i.test/alice.jpg")),
                    comment("second", user("alice", "https://i.test/alice.jpg")),
                    comment("third", user("bob", "")),
                ],
            )
            .unwrap();
        assert_eq!(written, 3);

        let stats = store.stats().unwrap();
        assert_eq!(stats.count(Table::Comments), 3);
        assert_eq!(stats.count(Table::Users), 2);
        assert_eq!(stats.count(Table::UserFiles), 1);

        let conn = Connection::open(&path).unwrap();
        let (date, orphans): (String, i64) = conn
            .query_row(
                "SELECT MIN(comment_date), \
                 (SELECT COUNT(*) FROM comments c LEFT JOIN users u ON u.user_id = c.user_id WHERE u.user_id IS NULL) \
                 FROM comments",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(date, "2024-03-01");
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_open_is_repeatable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        Store::open(&path).unwrap();
        let store = Store::open(&path).unwrap();
        assert!(store.stats().unwrap().tables.iter().all(|(_, n)| *n == 0));
    }
}
