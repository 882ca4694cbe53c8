use route_finder::error::Result;
use route_finder::queries::LookupTable;
use route_finder::sqlite::{open_in_memory, SqliteConfig};
use route_finder::{NewRoute, QueryCatalog, RouteQuery, RouteRepository};
use tempfile::NamedTempFile;

// Helper function to create an in-memory repository for testing
fn create_test_repo() -> Result<RouteRepository> {
    Ok(RouteRepository::new(open_in_memory()?, QueryCatalog::new()))
}

// Helper function to create a repository backed by a temporary file
fn create_temp_repo() -> Result<(RouteRepository, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let conn = SqliteConfig::new(temp_file.path()).open()?;
    Ok((RouteRepository::new(conn, QueryCatalog::new()), temp_file))
}

fn sample_route() -> NewRoute {
    NewRoute {
        flight: Some("F1".to_string()),
        source: "A".to_string(),
        destination: "B".to_string(),
        departure: "01.06.2025".to_string(),
        arrival: "02.06.2025".to_string(),
        transport: "Plane".to_string(),
        price: 100.0,
        distance: Some(50.0),
        seats: 20,
    }
}

#[test]
fn test_insert_and_find_by_transport() {
    test_insert_and_find_by_transport_impl().unwrap();
}

fn test_insert_and_find_by_transport_impl() -> Result<()> {
    let mut repo = create_test_repo()?;
    repo.insert_route(&sample_route())?;

    let table = repo.find_routes_by_transport("Plane")?;
    assert_eq!(table.rows().len(), 1);
    assert_eq!(
        table.rows()[0][1..],
        [
            "F1",
            "A",
            "B",
            "01.06.2025 00:00:00",
            "02.06.2025 00:00:00",
            "100",
            "20",
            "50",
            "Plane",
        ]
    );
    Ok(())
}

#[test]
fn test_lookup_insert_idempotence() {
    test_lookup_insert_idempotence_impl().unwrap();
}

fn test_lookup_insert_idempotence_impl() -> Result<()> {
    let repo = create_test_repo()?;
    repo.insert_if_not_exists(LookupTable::Destinations, "Санкт-Петербург")?;
    repo.insert_if_not_exists(LookupTable::Destinations, "Санкт-Петербург")?;

    let count: i64 = repo
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM destinations WHERE name = ?",
            ["Санкт-Петербург"],
            |row| row.get(0),
        )
        .map_err(|source| route_finder::RouteError::Storage {
            context: "count destinations",
            source,
        })?;
    assert_eq!(count, 1);
    Ok(())
}

#[test]
fn test_routes_share_lookup_rows() {
    test_routes_share_lookup_rows_impl().unwrap();
}

fn test_routes_share_lookup_rows_impl() -> Result<()> {
    let mut repo = create_test_repo()?;
    repo.insert_route(&sample_route())?;
    let mut back = sample_route();
    back.source = "B".to_string();
    back.destination = "A".to_string();
    repo.insert_route(&back)?;

    let destinations: i64 = repo
        .connection()
        .query_row("SELECT COUNT(*) FROM destinations", [], |row| row.get(0))
        .unwrap();
    let transports: i64 = repo
        .connection()
        .query_row("SELECT COUNT(*) FROM transport_types", [], |row| row.get(0))
        .unwrap();
    assert_eq!((destinations, transports), (2, 1));
    assert_eq!(repo.show_all_routes()?.rows().len(), 2);
    Ok(())
}

#[test]
fn test_filtered_search_blank_means_any() {
    test_filtered_search_blank_means_any_impl().unwrap();
}

fn test_filtered_search_blank_means_any_impl() -> Result<()> {
    let mut repo = create_test_repo()?;
    repo.insert_route(&sample_route())?;
    let mut train = sample_route();
    train.transport = "Train".to_string();
    train.price = 30.0;
    repo.insert_route(&train)?;

    let query = RouteQuery {
        source: "A".to_string(),
        destination: "B".to_string(),
        date: "01.06.2025".to_string(),
        transport: None,
        max_price: None,
    };
    assert_eq!(repo.find_routes(&query)?.rows().len(), 2);

    let later = RouteQuery {
        date: "02.06.2025".to_string(),
        ..query.clone()
    };
    assert!(repo.find_routes(&later)?.is_empty());

    let cheap = RouteQuery {
        max_price: Some(30.0),
        ..query
    };
    let table = repo.find_routes(&cheap)?;
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.rows()[0][9], "Train");
    Ok(())
}

#[test]
fn test_file_persistence() {
    test_file_persistence_impl().unwrap();
}

fn test_file_persistence_impl() -> Result<()> {
    let (mut repo, temp_file) = create_temp_repo()?;
    repo.insert_route(&sample_route())?;
    repo.close()?;

    let conn = SqliteConfig::new(temp_file.path()).open()?;
    let repo = RouteRepository::new(conn, QueryCatalog::new());
    let table = repo.find_routes_by_price(100.0)?;
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.rows()[0][2], "A");
    Ok(())
}

#[test]
fn test_table_rendering_of_results() {
    test_table_rendering_of_results_impl().unwrap();
}

fn test_table_rendering_of_results_impl() -> Result<()> {
    let mut repo = create_test_repo()?;
    let mut route = sample_route();
    route.source = "Москва".to_string();
    repo.insert_route(&route)?;

    let rendered = repo.show_all_routes()?.to_string();
    let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
    assert_eq!(widths.len(), 5);
    assert!(widths.iter().all(|w| *w == widths[0]));
    assert!(rendered.contains("| Москва "));
    Ok(())
}
