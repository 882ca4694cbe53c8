//! Route searches and inserts against the SQLite store.
//!
//! Every operation prepares its statement, binds parameters in the order the
//! [`QueryCatalog`] template lists them, and releases the statement before
//! returning. Searches hand back a [`Table`] ready for printing.

use rusqlite::{params_from_iter, Connection};

use crate::date::convert_to_sqlite_format;
use crate::error::{Result, RouteError, StorageContext};
use crate::queries::{LookupTable, Param, QueryCatalog, QueryName, QueryTemplate, ROUTE_COLUMNS};
use crate::sqlite::{cell_text, Value};
use crate::table::Table;

/// Parameters of a filtered search. Dates use the `DD.MM.YYYY` display form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteQuery {
    pub source: String,
    pub destination: String,
    pub date: String,
    /// `None` matches any transport type.
    pub transport: Option<String>,
    /// `None` means no price ceiling.
    pub max_price: Option<f64>,
}

/// A route as entered by the user. Dates use the `DD.MM.YYYY` display form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRoute {
    pub flight: Option<String>,
    pub source: String,
    pub destination: String,
    pub departure: String,
    pub arrival: String,
    pub transport: String,
    pub price: f64,
    pub distance: Option<f64>,
    pub seats: i64,
}

pub struct RouteRepository {
    conn: Connection,
    catalog: QueryCatalog,
}

impl RouteRepository {
    pub fn new(conn: Connection, catalog: QueryCatalog) -> Self {
        Self { conn, catalog }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Every route, cheapest first.
    pub fn show_all_routes(&self) -> Result<Table> {
        let template = fixed(&self.catalog, QueryName::SelectAll)?;
        select(&self.conn, template, |_| Value::Null)
    }

    pub fn find_routes(&self, query: &RouteQuery) -> Result<Table> {
        let date = convert_to_sqlite_format(&query.date)?;
        let template = self.catalog.filtered(|param| match param {
            Param::Transport => query.transport.as_deref().is_some_and(|t| !t.is_empty()),
            Param::Price => query.max_price.is_some(),
            _ => true,
        });
        select(&self.conn, &template, |param| match param {
            Param::Date => Value::from(date.as_str()),
            Param::Source => Value::from(query.source.as_str()),
            Param::Destination => Value::from(query.destination.as_str()),
            Param::Transport => Value::from(query.transport.clone()),
            Param::Price => Value::from(query.max_price),
            _ => Value::Null,
        })
    }

    pub fn find_routes_by_transport(&self, transport: &str) -> Result<Table> {
        let template = fixed(&self.catalog, QueryName::SelectByTransport)?;
        select(&self.conn, template, |_| Value::from(transport))
    }

    pub fn find_routes_by_price(&self, max_price: f64) -> Result<Table> {
        let template = fixed(&self.catalog, QueryName::SelectByPrice)?;
        select(&self.conn, template, |_| Value::from(max_price))
    }

    /// Adds `name` to a lookup table unless it is already there.
    ///
    /// Returns whether a row was inserted.
    pub fn insert_if_not_exists(&self, table: LookupTable, name: &str) -> Result<bool> {
        lookup_insert(&self.conn, &self.catalog, table, name)
    }

    /// Inserts a route and any lookup rows it needs in one transaction.
    ///
    /// Returns the new route id.
    pub fn insert_route(&mut self, route: &NewRoute) -> Result<i64> {
        let departure = convert_to_sqlite_format(&route.departure)?;
        let arrival = convert_to_sqlite_format(&route.arrival)?;

        let tx = self.conn.transaction().storage("failed to begin transaction")?;
        lookup_insert(&tx, &self.catalog, LookupTable::TransportTypes, &route.transport)?;
        lookup_insert(&tx, &self.catalog, LookupTable::Destinations, &route.source)?;
        lookup_insert(&tx, &self.catalog, LookupTable::Destinations, &route.destination)?;

        let template = fixed(&self.catalog, QueryName::InsertRoute)?;
        execute(&tx, template, |param| match param {
            Param::Flight => Value::from(route.flight.clone()),
            Param::Transport => Value::from(route.transport.as_str()),
            Param::Source => Value::from(route.source.as_str()),
            Param::Destination => Value::from(route.destination.as_str()),
            Param::Distance => Value::from(route.distance),
            Param::Departure => Value::from(departure.as_str()),
            Param::Arrival => Value::from(arrival.as_str()),
            Param::Seats => Value::from(route.seats),
            Param::Price => Value::from(route.price),
            _ => Value::Null,
        })?;
        let id = tx.last_insert_rowid();
        tx.commit().storage("failed to commit route insert")?;
        log::info!("inserted route {id} from {} to {}", route.source, route.destination);
        Ok(id)
    }

    /// Closes the underlying connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, source)| RouteError::Storage {
                context: "failed to close database",
                source,
            })
    }
}

fn fixed(catalog: &QueryCatalog, name: QueryName) -> Result<&QueryTemplate> {
    catalog
        .get(name)
        .ok_or_else(|| RouteError::Config(format!("no query template for {name:?}")))
}

fn bind(template: &QueryTemplate, value_of: impl Fn(Param) -> Value) -> Vec<Value> {
    template.params.iter().map(|param| value_of(*param)).collect()
}

fn select(
    conn: &Connection,
    template: &QueryTemplate,
    value_of: impl Fn(Param) -> Value,
) -> Result<Table> {
    let values = bind(template, value_of);
    log::debug!("running {:?} with {} parameter(s)", template.name, values.len());
    let mut stmt = conn
        .prepare(&template.sql)
        .storage("failed to prepare statement")?;
    let mut rows = stmt
        .query(params_from_iter(values.iter()))
        .storage("failed to bind parameters")?;

    let mut table = Table::new(ROUTE_COLUMNS);
    while let Some(row) = rows.next().storage("failed to read row")? {
        let cells = (0..ROUTE_COLUMNS.len())
            .map(|idx| cell_text(row, idx))
            .collect::<rusqlite::Result<Vec<_>>>()
            .storage("failed to read row")?;
        table.push_row(cells);
    }
    log::debug!("{:?} returned {} row(s)", template.name, table.rows().len());
    Ok(table)
}

fn execute(
    conn: &Connection,
    template: &QueryTemplate,
    value_of: impl Fn(Param) -> Value,
) -> Result<usize> {
    let values = bind(template, value_of);
    log::debug!("running {:?} with {} parameter(s)", template.name, values.len());
    let mut stmt = conn
        .prepare(&template.sql)
        .storage("failed to prepare statement")?;
    stmt.execute(params_from_iter(values.iter()))
        .storage("failed to execute statement")
}

fn lookup_insert(
    conn: &Connection,
    catalog: &QueryCatalog,
    table: LookupTable,
    name: &str,
) -> Result<bool> {
    let template = fixed(catalog, table.insert_query())?;
    let inserted = execute(conn, template, |_| Value::from(name))? > 0;
    if inserted {
        log::debug!("added '{name}' to {}", table.table_name());
    }
    Ok(inserted)
}
