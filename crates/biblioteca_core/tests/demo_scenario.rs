use biblioteca_core::demo::{seed_books, SEARCH_AUTHOR};
use biblioteca_core::report::NO_BOOKS_MESSAGE;
use biblioteca_core::{run_demo, BookService, SessionFactory};

#[test]
fn walkthrough_updates_first_and_deletes_second_book() {
    let factory = SessionFactory::open_in_memory().unwrap();
    let service = BookService::new(&factory);
    let mut out = Vec::new();

    let summary = run_demo(&service, &mut out).unwrap();
    assert_eq!(summary.inserted, vec![1, 2, 3]);

    let seeds = seed_books();
    assert_eq!(summary.remaining.len(), 2);
    let first = &summary.remaining[0];
    let third = &summary.remaining[1];
    assert_eq!(first.id(), Some(1));
    assert_eq!(first.title, seeds[0].title);
    assert!(!first.available);
    assert_eq!(third.id(), Some(3));
    assert_eq!(third.title, seeds[2].title);
    assert!(third.available);
    assert!(service.get_book(2).unwrap().is_none());

    drop(service);
    factory.close().unwrap();
}

#[test]
fn walkthrough_report_lists_search_and_outcomes() {
    let factory = SessionFactory::open_in_memory().unwrap();
    let service = BookService::new(&factory);
    let mut out = Vec::new();

    run_demo(&service, &mut out).unwrap();
    let report = String::from_utf8(out).unwrap();

    assert_eq!(report.matches("\nBook listing:\n").count(), 2);
    assert!(report.contains(&format!("Searching books by author: '{SEARCH_AUTHOR}'")));
    assert!(report.contains("Availability of book with ID: 1 updated to false"));
    assert!(report.contains("Book with ID: 2 was deleted"));
    assert!(!report.contains(NO_BOOKS_MESSAGE));

    let (_, final_listing) = report.rsplit_once("\nBook listing:\n").unwrap();
    assert!(final_listing.contains("Book ID: 1\nTitle: Star Wars: Heir to the Empire"));
    assert!(final_listing.contains("Available: false"));
    assert!(final_listing.contains("Book ID: 3\n"));
    assert!(!final_listing.contains("Book ID: 2\n"));
}

#[test]
fn walkthrough_stops_on_operation_failure() {
    let factory = SessionFactory::open_in_memory().unwrap();
    {
        let session = factory.open_session().unwrap();
        session
            .connection()
            .execute_batch("DROP TABLE libros;")
            .unwrap();
    }
    let service = BookService::new(&factory);
    let mut out = Vec::new();

    let err = run_demo(&service, &mut out).unwrap_err();
    assert!(err.to_string().starts_with("could not insert the book: "));
    assert!(out.is_empty());
}
