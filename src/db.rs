use crate::config::Config;
use crate::model::{Favorite, FavoriteTarget, Person, Planet, User};
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase, Row};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_schema.sql", include_str!("migrations/001_schema.sql"))];

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    tx_lock: Mutex<()>,
    turso_url: Option<String>,
    turso_auth_token: Option<String>,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_replica(turso_url: &Option<String>, turso_auth_token: &Option<String>) -> bool {
        turso_url.is_some() && turso_auth_token.is_some()
    }

    pub async fn sync(&self) -> Result<()> {
        if Self::is_replica(&self.turso_url, &self.turso_auth_token) {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        match conn.execute(query, libsql::params![name]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    async fn setup(db: LibsqlDatabase, turso_url: Option<String>, turso_auth_token: Option<String>) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        for (filename, sql) in MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database {
            db,
            conn,
            tx_lock: Mutex::new(()),
            turso_url,
            turso_auth_token,
        })
    }

    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(cfg.app.get_db());
        let turso_url = cfg.app.turso_url.clone();
        let turso_auth_token = cfg.app.turso_auth_token.clone();

        let db = match (&turso_url, &turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                Builder::new_synced_database(&path, url.clone(), token.clone())
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => Builder::new_local(&path).build().await?,
        };

        Self::setup(db, turso_url, turso_auth_token).await
    }

    /// In-memory database with migrations applied. Used by tests.
    pub async fn in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::setup(db, None, None).await
    }

    fn row_to_user(row: &Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password: row.get(2)?,
            is_active: row.get::<i64>(3)? != 0,
        })
    }

    fn row_to_person(row: &Row) -> Result<Person> {
        Ok(Person {
            id: row.get(0)?,
            name: row.get(1)?,
            gender: row.get(2)?,
        })
    }

    fn row_to_planet(row: &Row) -> Result<Planet> {
        Ok(Planet {
            id: row.get(0)?,
            name: row.get(1)?,
            population: row.get(2)?,
        })
    }

    fn row_to_favorite(row: &Row) -> Result<Favorite> {
        Ok(Favorite {
            id: row.get(0)?,
            user_id: row.get(1)?,
            people_id: row.get::<Option<i64>>(2)?,
            planet_id: row.get::<Option<i64>>(3)?,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let query = "SELECT id, email, password, is_active FROM users ORDER BY id";
        let mut rows = self.conn.query(query, ()).await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(Self::row_to_user(&row)?);
        }
        Ok(users)
    }

    pub async fn list_people(&self) -> Result<Vec<Person>> {
        let query = "SELECT id, name, gender FROM people ORDER BY id";
        let mut rows = self.conn.query(query, ()).await?;

        let mut people = Vec::new();
        while let Some(row) = rows.next().await? {
            people.push(Self::row_to_person(&row)?);
        }
        Ok(people)
    }

    pub async fn get_person(&self, id: i64) -> Result<Option<Person>> {
        let query = "SELECT id, name, gender FROM people WHERE id = ?";
        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_person(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_planets(&self) -> Result<Vec<Planet>> {
        let query = "SELECT id, name, population FROM planets ORDER BY id";
        let mut rows = self.conn.query(query, ()).await?;

        let mut planets = Vec::new();
        while let Some(row) = rows.next().await? {
            planets.push(Self::row_to_planet(&row)?);
        }
        Ok(planets)
    }

    pub async fn get_planet(&self, id: i64) -> Result<Option<Planet>> {
        let query = "SELECT id, name, population FROM planets WHERE id = ?";
        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_planet(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Favorites for one user. `None` matches NULL, i.e. no rows.
    pub async fn list_favorites_for_user(&self, user_id: Option<i64>) -> Result<Vec<Favorite>> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };

        let query = r#"
            SELECT id, user_id, people_id, planet_id
            FROM favorites WHERE user_id = ?
            ORDER BY id
        "#;
        let mut rows = self.conn.query(query, libsql::params![user_id]).await?;

        let mut favorites = Vec::new();
        while let Some(row) = rows.next().await? {
            favorites.push(Self::row_to_favorite(&row)?);
        }
        Ok(favorites)
    }

    pub async fn find_favorite(&self, user_id: i64, target: FavoriteTarget) -> Result<Option<Favorite>> {
        let query = format!(
            "SELECT id, user_id, people_id, planet_id FROM favorites WHERE user_id = ? AND {} = ?",
            target.column()
        );
        let mut rows = self
            .conn
            .query(&query, libsql::params![user_id, target.id()])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_favorite(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Inserts a favorite unless one already exists for (user, target).
    /// Returns `None` on a duplicate. Check and insert run in one
    /// transaction; every exit path commits or rolls back.
    pub async fn add_favorite(&self, user_id: i64, target: FavoriteTarget) -> Result<Option<Favorite>> {
        let _guard = self.tx_lock.lock().await;

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        let result = self.add_favorite_internal(user_id, target).await;

        match result {
            Ok(favorite) => {
                self.conn.execute("COMMIT", ()).await?;
                Ok(favorite)
            }
            Err(e) => {
                let _ = self.conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    async fn add_favorite_internal(&self, user_id: i64, target: FavoriteTarget) -> Result<Option<Favorite>> {
        if self.find_favorite(user_id, target).await?.is_some() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO favorites (user_id, {}) VALUES (?, ?) RETURNING id, user_id, people_id, planet_id",
            target.column()
        );
        let mut rows = self
            .conn
            .query(&query, libsql::params![user_id, target.id()])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_favorite(&row)?))
        } else {
            anyhow::bail!("Failed to create favorite")
        }
    }

    /// Deletes the favorite for (user, target). Returns false if none existed.
    pub async fn remove_favorite(&self, user_id: i64, target: FavoriteTarget) -> Result<bool> {
        let query = format!(
            "DELETE FROM favorites WHERE user_id = ? AND {} = ?",
            target.column()
        );
        let affected = self
            .conn
            .execute(&query, libsql::params![user_id, target.id()])
            .await?;

        Ok(affected > 0)
    }
}
