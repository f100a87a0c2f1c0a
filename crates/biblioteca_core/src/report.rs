//! Console rendering for catalogue operations.
//!
//! Writers take any `io::Write` so the binary can target stdout while
//! tests capture into a buffer.

use crate::model::book::{Book, BookId};
use crate::service::book_service::MutationOutcome;
use std::io::{self, Write};

pub const NO_BOOKS_MESSAGE: &str = "No books are registered in the database";

/// Prints every book, or the empty-catalogue line when there are none.
pub fn write_listing<W: Write>(out: &mut W, books: &[Book]) -> io::Result<()> {
    if books.is_empty() {
        return writeln!(out, "{NO_BOOKS_MESSAGE}");
    }
    write_books(out, books)
}

/// Prints author search matches, or a not-found line naming the author.
pub fn write_author_matches<W: Write>(out: &mut W, author: &str, books: &[Book]) -> io::Result<()> {
    if books.is_empty() {
        return writeln!(out, "No book found by author: {author}");
    }
    write_books(out, books)
}

pub fn write_update_outcome<W: Write>(out: &mut W, outcome: &MutationOutcome) -> io::Result<()> {
    match outcome {
        MutationOutcome::Applied { id, book } => writeln!(
            out,
            "Availability of book with ID: {id} updated to {}",
            book.available
        ),
        MutationOutcome::NotFound(id) => write_not_found(out, *id),
    }
}

pub fn write_delete_outcome<W: Write>(out: &mut W, outcome: &MutationOutcome) -> io::Result<()> {
    match outcome {
        MutationOutcome::Applied { id, .. } => writeln!(out, "Book with ID: {id} was deleted"),
        MutationOutcome::NotFound(id) => write_not_found(out, *id),
    }
}

fn write_not_found<W: Write>(out: &mut W, id: BookId) -> io::Result<()> {
    writeln!(out, "No book found with ID: {id}")
}

fn write_books<W: Write>(out: &mut W, books: &[Book]) -> io::Result<()> {
    for book in books {
        writeln!(out)?;
        writeln!(out, "{book}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        write_author_matches, write_delete_outcome, write_listing, write_update_outcome,
        NO_BOOKS_MESSAGE,
    };
    use crate::model::book::Book;
    use crate::service::book_service::MutationOutcome;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_listing_prints_single_line() {
        let output = render(|out| write_listing(out, &[]));
        assert_eq!(output, format!("{NO_BOOKS_MESSAGE}\n"));
    }

    #[test]
    fn listing_renders_each_field() {
        let book = Book::persisted(4, "Dune".to_string(), "Frank Herbert".to_string(), false);
        let output = render(|out| write_listing(out, &[book]));
        assert_eq!(
            output,
            "\nBook ID: 4\nTitle: Dune\nAuthor: Frank Herbert\nAvailable: false\n"
        );
    }

    #[test]
    fn empty_author_search_names_author() {
        let output = render(|out| write_author_matches(out, "Ursula K. Le Guin", &[]));
        assert_eq!(output, "No book found by author: Ursula K. Le Guin\n");
    }

    #[test]
    fn delete_not_found_names_id() {
        let output = render(|out| write_delete_outcome(out, &MutationOutcome::NotFound(999)));
        assert_eq!(output, "No book found with ID: 999\n");
    }

    #[test]
    fn update_not_found_names_id() {
        let output = render(|out| write_update_outcome(out, &MutationOutcome::NotFound(999)));
        assert_eq!(output, "No book found with ID: 999\n");
    }

    #[test]
    fn update_applied_reports_new_value() {
        let book = Book::persisted(1, "Dune".to_string(), "Frank Herbert".to_string(), false);
        let outcome = MutationOutcome::Applied { id: 1, book };
        let output = render(|out| write_update_outcome(out, &outcome));
        assert_eq!(output, "Availability of book with ID: 1 updated to false\n");
    }
}
