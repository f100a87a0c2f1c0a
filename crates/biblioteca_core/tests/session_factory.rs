use biblioteca_core::{
    Book, BookRepository, BookService, DatabaseSettings, DbError, Operation, RepoError,
    SessionFactory, SqliteBookRepository, StoreTarget,
};

#[test]
fn sessions_of_one_in_memory_factory_share_data() {
    let factory = SessionFactory::open_in_memory().unwrap();

    let mut writer = factory.open_session().unwrap();
    let tx = writer.begin().unwrap();
    SqliteBookRepository::new(&tx)
        .insert(&Book::new("Solaris", "Stanisław Lem", true))
        .unwrap();
    tx.commit().unwrap();
    drop(writer);

    let reader = factory.open_session().unwrap();
    let count = SqliteBookRepository::new(reader.connection()).count().unwrap();
    assert_eq!(count, 1);
}

#[test]
fn separate_in_memory_factories_are_isolated() {
    let first = SessionFactory::open_in_memory().unwrap();
    let second = SessionFactory::open_in_memory().unwrap();
    assert_ne!(first.target(), second.target());

    let mut book = Book::new("Solaris", "Stanisław Lem", true);
    BookService::new(&first).insert_book(&mut book).unwrap();

    assert!(BookService::new(&second).list_books().unwrap().is_empty());
}

#[test]
fn uncommitted_transaction_rolls_back_on_drop() {
    let factory = SessionFactory::open_in_memory().unwrap();

    {
        let mut session = factory.open_session().unwrap();
        let tx = session.begin().unwrap();
        SqliteBookRepository::new(&tx)
            .insert(&Book::new("Solaris", "Stanisław Lem", true))
            .unwrap();
    }

    let session = factory.open_session().unwrap();
    assert_eq!(
        SqliteBookRepository::new(session.connection())
            .count()
            .unwrap(),
        0
    );
}

#[test]
fn session_ids_increase_per_factory() {
    let factory = SessionFactory::open_in_memory().unwrap();
    let first = factory.open_session().unwrap().id();
    let second = factory.open_session().unwrap().id();
    assert!(second > first);
}

#[test]
fn file_store_survives_factory_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libros.sqlite3");

    let factory = SessionFactory::open_file(&path).unwrap();
    assert_eq!(factory.target(), &StoreTarget::File(path.clone()));
    let mut book = Book::new("Kindred", "Octavia E. Butler", true);
    let id = BookService::new(&factory).insert_book(&mut book).unwrap();
    factory.close().unwrap();

    let reopened = SessionFactory::open(&DatabaseSettings::file(&path)).unwrap();
    let loaded = BookService::new(&reopened).get_book(id).unwrap();
    assert_eq!(loaded, Some(book));
    reopened.close().unwrap();
}

#[test]
fn unreachable_store_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("libros.sqlite3");

    let err = SessionFactory::open_file(&path).err().unwrap();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn storage_failure_is_reported_with_operation_name() {
    let factory = SessionFactory::open_in_memory().unwrap();
    {
        let session = factory.open_session().unwrap();
        session
            .connection()
            .execute_batch("DROP TABLE libros;")
            .unwrap();
    }

    let err = BookService::new(&factory).list_books().unwrap_err();
    assert_eq!(err.operation, Operation::ListAll);
    assert!(matches!(err.source, RepoError::Db(DbError::Sqlite(_))));
    assert!(err.to_string().starts_with("could not list the books: "));
}

#[test]
fn failed_mutation_leaves_store_unchanged() {
    let factory = SessionFactory::open_in_memory().unwrap();
    let service = BookService::new(&factory);
    let mut book = Book::new("Kindred", "Octavia E. Butler", true);
    let id = service.insert_book(&mut book).unwrap();

    {
        let session = factory.open_session().unwrap();
        session
            .connection()
            .execute_batch(
                "CREATE TRIGGER reject_delete BEFORE DELETE ON libros
                 BEGIN SELECT RAISE(ABORT, 'deletes are frozen'); END;",
            )
            .unwrap();
    }

    let err = service.delete_book(id).unwrap_err();
    assert_eq!(err.operation, Operation::Delete);
    assert!(err.to_string().contains("deletes are frozen"));
    assert_eq!(service.get_book(id).unwrap(), Some(book));
}
