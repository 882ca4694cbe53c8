//! Parameterized SQL for every route operation.
//!
//! Templates are fixed text; each one carries the ordered list of
//! [`Param`] slots its placeholders expect. The filtered search is the only
//! query assembled at run time: its optional clauses are appended only when
//! the user gave a value, so blank fields never reach the statement.

use std::collections::HashMap;

/// Columns produced by every route select, in order.
pub const ROUTE_COLUMNS: [&str; 10] = [
    "ID",
    "Flight",
    "Source",
    "Destination",
    "Departure",
    "Arrival",
    "Price",
    "Seats",
    "Distance",
    "Transport",
];

const ROUTE_SELECT: &str = r#"
    SELECT r.id, r.flight, d1.name AS source, d2.name AS destination,
           strftime('%d.%m.%Y %H:%M:%S', r.departure_time) AS departure_time,
           strftime('%d.%m.%Y %H:%M:%S', r.arrival_time) AS arrival_time,
           r.ticket_price, r.seats_available, r.distance, t.name AS transport
    FROM routes r
    JOIN destinations d1 ON r.source_id = d1.id
    JOIN destinations d2 ON r.destination_id = d2.id
    JOIN transport_types t ON r.transport_type_id = t.id"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    SelectAll,
    SelectFiltered,
    SelectByTransport,
    SelectByPrice,
    InsertRoute,
    InsertDestinationIfNotExists,
    InsertTransportTypeIfNotExists,
}

/// A named input a template placeholder is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Date,
    Source,
    Destination,
    Transport,
    Price,
    Flight,
    Distance,
    Departure,
    Arrival,
    Seats,
    Name,
}

/// Lookup tables that route rows reference by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Destinations,
    TransportTypes,
}

impl LookupTable {
    pub fn table_name(self) -> &'static str {
        match self {
            LookupTable::Destinations => "destinations",
            LookupTable::TransportTypes => "transport_types",
        }
    }

    pub fn insert_query(self) -> QueryName {
        match self {
            LookupTable::Destinations => QueryName::InsertDestinationIfNotExists,
            LookupTable::TransportTypes => QueryName::InsertTransportTypeIfNotExists,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    pub name: QueryName,
    pub sql: String,
    pub params: Vec<Param>,
}

impl QueryTemplate {
    fn new(name: QueryName, sql: impl Into<String>, params: &[Param]) -> Self {
        Self {
            name,
            sql: sql.into(),
            params: params.to_vec(),
        }
    }
}

/// An extra `AND` clause applied only when its parameter is non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalFilter {
    pub clause: &'static str,
    pub param: Param,
}

/// Read-only mapping from operation to SQL, built once at startup.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    templates: HashMap<QueryName, QueryTemplate>,
    filtered_where: &'static str,
    filtered_order: &'static str,
    optional_filters: Vec<OptionalFilter>,
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCatalog {
    pub fn new() -> Self {
        use Param::*;

        let mut templates = HashMap::new();
        let mut add = |template: QueryTemplate| {
            templates.insert(template.name, template);
        };
        add(QueryTemplate::new(
            QueryName::SelectAll,
            format!("{ROUTE_SELECT}\n    ORDER BY r.ticket_price ASC"),
            &[],
        ));
        add(QueryTemplate::new(
            QueryName::SelectByTransport,
            format!("{ROUTE_SELECT}\n    WHERE t.name = ?\n    ORDER BY t.name ASC"),
            &[Transport],
        ));
        add(QueryTemplate::new(
            QueryName::SelectByPrice,
            format!("{ROUTE_SELECT}\n    WHERE r.ticket_price <= ?\n    ORDER BY r.ticket_price ASC"),
            &[Price],
        ));
        add(QueryTemplate::new(
            QueryName::InsertRoute,
            r#"
    INSERT INTO routes (flight, transport_type_id, source_id, destination_id, distance,
                        departure_time, arrival_time, seats_available, ticket_price)
    VALUES (
        ?,
        (SELECT id FROM transport_types WHERE name = ?),
        (SELECT id FROM destinations WHERE name = ?),
        (SELECT id FROM destinations WHERE name = ?),
        ?, ?, ?, ?, ?
    )"#,
            &[
                Flight,
                Transport,
                Source,
                Destination,
                Distance,
                Departure,
                Arrival,
                Seats,
                Price,
            ],
        ));
        for table in [LookupTable::Destinations, LookupTable::TransportTypes] {
            let name = table.table_name();
            add(QueryTemplate::new(
                table.insert_query(),
                format!(
                    "INSERT INTO {name} (name) SELECT ? \
                     WHERE NOT EXISTS (SELECT 1 FROM {name} WHERE name = ?)"
                ),
                &[Name, Name],
            ));
        }

        Self {
            templates,
            filtered_where: "WHERE r.departure_time >= ? AND d1.name = ? AND d2.name = ?",
            filtered_order: "ORDER BY r.departure_time ASC",
            optional_filters: vec![
                OptionalFilter {
                    clause: "t.name = ?",
                    param: Transport,
                },
                OptionalFilter {
                    clause: "r.ticket_price <= ?",
                    param: Price,
                },
            ],
        }
    }

    /// Fixed template for `name`.
    ///
    /// Every [`QueryName`] except [`QueryName::SelectFiltered`] has one; the
    /// filtered search goes through [`QueryCatalog::filtered`].
    pub fn get(&self, name: QueryName) -> Option<&QueryTemplate> {
        self.templates.get(&name)
    }

    /// Builds the filtered search, keeping only optional clauses whose
    /// parameter `is_set` reports as present.
    pub fn filtered(&self, is_set: impl Fn(Param) -> bool) -> QueryTemplate {
        let mut sql = format!("{ROUTE_SELECT}\n    {}", self.filtered_where);
        let mut params = vec![Param::Date, Param::Source, Param::Destination];
        for filter in self.optional_filters.iter().filter(|f| is_set(f.param)) {
            sql.push_str("\n    AND ");
            sql.push_str(filter.clause);
            params.push(filter.param);
        }
        sql.push_str("\n    ");
        sql.push_str(self.filtered_order);
        QueryTemplate {
            name: QueryName::SelectFiltered,
            sql,
            params,
        }
    }
}
