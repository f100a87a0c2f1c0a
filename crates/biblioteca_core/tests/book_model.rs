use biblioteca_core::Book;

#[test]
fn new_book_is_transient() {
    let book = Book::new("Solaris", "Stanisław Lem", true);

    assert_eq!(book.id(), None);
    assert!(!book.is_persisted());
    assert_eq!(book.title, "Solaris");
    assert_eq!(book.author, "Stanisław Lem");
    assert!(book.available);
}

#[test]
fn display_renders_every_field() {
    let book = Book::new("Solaris", "Stanisław Lem", false);

    assert_eq!(
        book.to_string(),
        "Book ID: (unsaved)\nTitle: Solaris\nAuthor: Stanisław Lem\nAvailable: false"
    );
}

#[test]
fn serde_shape_uses_plain_field_names() {
    let book = Book::new("Solaris", "Stanisław Lem", true);
    let value = serde_json::to_value(&book).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "id": null,
            "title": "Solaris",
            "author": "Stanisław Lem",
            "available": true
        })
    );
}
