//! Catalog seeding helpers for tests.

use crate::Database;

pub(crate) async fn project(db: &Database, name: &str) {
    sqlx::query("INSERT INTO packages (name, normalized_name) VALUES (?, ?)")
        .bind(name)
        .bind(crate::normalize(name))
        .execute(db.pool())
        .await
        .unwrap();
}

pub(crate) async fn release(db: &Database, name: &str, version: &str, ordering: Option<i64>) {
    sqlx::query("INSERT INTO releases (name, version, _pypi_ordering) VALUES (?, ?, ?)")
        .bind(name)
        .bind(version)
        .bind(ordering)
        .execute(db.pool())
        .await
        .unwrap();
}

pub(crate) async fn dependency(db: &Database, name: &str, version: &str, kind: i64, specifier: &str) {
    sqlx::query("INSERT INTO release_dependencies (name, version, kind, specifier) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(version)
        .bind(kind)
        .bind(specifier)
        .execute(db.pool())
        .await
        .unwrap();
}

pub(crate) struct File<'a> {
    pub(crate) filename: &'a str,
    pub(crate) python_version: &'a str,
    pub(crate) packagetype: &'a str,
    pub(crate) md5_digest: Option<&'a str>,
    pub(crate) downloads: i64,
    pub(crate) upload_time: Option<i64>,
}
impl Default for File<'_> {
    fn default() -> Self {
        Self {
            filename: "",
            python_version: "source",
            packagetype: "sdist",
            md5_digest: None,
            downloads: 0,
            upload_time: None,
        }
    }
}

pub(crate) async fn file(db: &Database, name: &str, version: &str, file: File<'_>) {
    sqlx::query(
        "INSERT INTO release_files (name, version, filename, python_version, packagetype, md5_digest, downloads, upload_time) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(version)
    .bind(file.filename)
    .bind(file.python_version)
    .bind(file.packagetype)
    .bind(file.md5_digest)
    .bind(file.downloads)
    .bind(file.upload_time)
    .execute(db.pool())
    .await
    .unwrap();
}
