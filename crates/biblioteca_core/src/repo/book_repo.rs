//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Map `Book` values to `libros` rows and back.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Text columns are stored and read back verbatim.
//! - Read paths reject a `disponible` value outside 0/1 instead of masking it.
//! - Caller-supplied values are always bound, never interpolated.

use crate::db::DbError;
use crate::model::book::{Book, BookId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    titulo,
    autor,
    disponible
FROM libros";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(BookId),
    /// Insert was requested for a book that already has an id.
    AlreadyPersisted(BookId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::AlreadyPersisted(id) => write!(f, "book {id} is already persisted"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::AlreadyPersisted(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Inserts a transient book and returns the id storage assigned.
    fn insert(&self, book: &Book) -> RepoResult<BookId>;
    /// Gets one book by id.
    fn get(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists every book ordered by id.
    fn list_all(&self) -> RepoResult<Vec<Book>>;
    /// Lists books whose author equals `author` exactly.
    fn find_by_author(&self, author: &str) -> RepoResult<Vec<Book>>;
    /// Writes the full state of `book`, inserting when it has no id or no
    /// matching row, and returns its id.
    fn merge(&self, book: &Book) -> RepoResult<BookId>;
    /// Deletes the row with `id`.
    fn remove(&self, id: BookId) -> RepoResult<()>;
    /// Counts stored books.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed book repository.
///
/// Accepts a plain connection or, through deref, an open transaction.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert(&self, book: &Book) -> RepoResult<BookId> {
        if let Some(id) = book.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }

        self.conn.execute(
            "INSERT INTO libros (titulo, autor, disponible) VALUES (?1, ?2, ?3);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                bool_to_int(book.available)
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_book_row(row)))
            .optional()?;

        row.transpose()
    }

    fn list_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query([])?;
        collect_books(rows)
    }

    fn find_by_author(&self, author: &str) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{BOOK_SELECT_SQL} WHERE autor = ?1 ORDER BY id ASC;"))?;
        let rows = stmt.query([author])?;
        collect_books(rows)
    }

    fn merge(&self, book: &Book) -> RepoResult<BookId> {
        let Some(id) = book.id() else {
            return self.insert(book);
        };

        self.conn.execute(
            "INSERT INTO libros (id, titulo, autor, disponible)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                titulo = excluded.titulo,
                autor = excluded.autor,
                disponible = excluded.disponible;",
            params![
                id,
                book.title.as_str(),
                book.author.as_str(),
                bool_to_int(book.available)
            ],
        )?;

        Ok(id)
    }

    fn remove(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM libros WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM libros;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn collect_books(mut rows: rusqlite::Rows<'_>) -> RepoResult<Vec<Book>> {
    let mut books = Vec::new();
    while let Some(row) = rows.next()? {
        books.push(parse_book_row(row)?);
    }
    Ok(books)
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let available = match row.get::<_, i64>("disponible")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid disponible value `{other}` in libros.disponible for id {id}"
            )));
        }
    };

    Ok(Book::persisted(
        id,
        row.get("titulo")?,
        row.get("autor")?,
        available,
    ))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
