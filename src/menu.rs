//! Line-oriented menu driving the route operations.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Result, RouteError};
use crate::repository::{NewRoute, RouteQuery, RouteRepository};
use crate::table::Table;
use crate::validation::{is_non_negative_integer, is_non_negative_number, is_valid_date};

const MENU: &str = "\
Choose the operation:
Show all routes - 1
Find route by parameters - 2
Find route by transport type - 3
Find route by max ticket price - 4
Add new route - 5
Exit - 6
";

/// What to do when the operation number is not one the menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidChoicePolicy {
    /// Fail with [`RouteError::InvalidChoice`].
    #[default]
    Exit,
    /// Report the mistake and show the menu again.
    Reprompt,
}

impl FromStr for InvalidChoicePolicy {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exit" => Ok(InvalidChoicePolicy::Exit),
            "reprompt" => Ok(InvalidChoicePolicy::Reprompt),
            other => Err(RouteError::Config(format!(
                "unknown invalid-choice policy '{other}', expected 'exit' or 'reprompt'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ShowAll,
    FindByParams,
    FindByTransport,
    FindByPrice,
    InsertRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    AwaitingChoice,
    AwaitingInput(Operation),
    Terminated,
}

pub struct Menu<'a, R, W> {
    repo: &'a mut RouteRepository,
    input: R,
    output: W,
    policy: InvalidChoicePolicy,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(repo: &'a mut RouteRepository, input: R, output: W, policy: InvalidChoicePolicy) -> Self {
        Self {
            repo,
            input,
            output,
            policy,
        }
    }

    /// Runs until the user picks exit or input runs out at the menu prompt.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Route Finder!")?;
        let mut state = MenuState::AwaitingChoice;
        while state != MenuState::Terminated {
            state = self.step(state)?;
        }
        Ok(())
    }

    pub fn step(&mut self, state: MenuState) -> Result<MenuState> {
        let next = match state {
            MenuState::AwaitingChoice => self.choose()?,
            MenuState::AwaitingInput(operation) => {
                self.perform(operation)?;
                MenuState::AwaitingChoice
            }
            MenuState::Terminated => MenuState::Terminated,
        };
        log::debug!("menu transition {state:?} -> {next:?}");
        Ok(next)
    }

    fn choose(&mut self) -> Result<MenuState> {
        self.output.write_all(MENU.as_bytes())?;
        self.output.flush()?;
        let Some(raw) = self.read_line()? else {
            return Ok(MenuState::Terminated);
        };
        let operation = match raw.trim() {
            "1" => Operation::ShowAll,
            "2" => Operation::FindByParams,
            "3" => Operation::FindByTransport,
            "4" => Operation::FindByPrice,
            "5" => Operation::InsertRoute,
            "6" => return Ok(MenuState::Terminated),
            other => {
                return match self.policy {
                    InvalidChoicePolicy::Exit => Err(RouteError::InvalidChoice(other.to_string())),
                    InvalidChoicePolicy::Reprompt => {
                        log::warn!("ignoring unknown operation '{other}'");
                        writeln!(self.output, "Unknown operation '{other}', try again.")?;
                        Ok(MenuState::AwaitingChoice)
                    }
                }
            }
        };
        Ok(MenuState::AwaitingInput(operation))
    }

    fn perform(&mut self, operation: Operation) -> Result<()> {
        match operation {
            Operation::ShowAll => {
                let table = self.repo.show_all_routes()?;
                self.print_routes(&table)
            }
            Operation::FindByParams => {
                let query = self.read_route_query()?;
                let table = self.repo.find_routes(&query)?;
                self.print_routes(&table)
            }
            Operation::FindByTransport => {
                let transport = self.prompt("Enter preferred transport type: ", "transport type")?;
                let table = self.repo.find_routes_by_transport(&transport)?;
                self.print_routes(&table)
            }
            Operation::FindByPrice => {
                let price = self.prompt("Enter maximum ticket price: ", "ticket price")?;
                let price = parse_number("ticket price", &price)?;
                let table = self.repo.find_routes_by_price(price)?;
                self.print_routes(&table)
            }
            Operation::InsertRoute => {
                let route = self.read_new_route()?;
                self.repo.insert_route(&route)?;
                writeln!(self.output, "Route added successfully.")?;
                Ok(())
            }
        }
    }

    fn read_route_query(&mut self) -> Result<RouteQuery> {
        let source = self.prompt("Enter source location: ", "source location")?;
        let destination = self.prompt("Enter destination location: ", "destination location")?;
        let date = self.prompt("Enter preferred date (DD.MM.YYYY): ", "date")?;
        check_date(&date)?;
        let transport = self.prompt(
            "Enter preferred transport type (or leave empty for any): ",
            "transport type",
        )?;
        let price = self.prompt(
            "Enter maximum ticket price (or leave empty for any): ",
            "ticket price",
        )?;
        Ok(RouteQuery {
            source,
            destination,
            date,
            transport: non_blank(transport),
            max_price: non_blank(price)
                .map(|p| parse_number("ticket price", &p))
                .transpose()?,
        })
    }

    fn read_new_route(&mut self) -> Result<NewRoute> {
        let flight = self.prompt("Enter flight number (or leave empty): ", "flight")?;
        let source = self.prompt("Enter source location: ", "source location")?;
        let destination = self.prompt("Enter destination location: ", "destination location")?;
        let departure = self.prompt("Enter departure date (DD.MM.YYYY): ", "departure date")?;
        check_date(&departure)?;
        let arrival = self.prompt("Enter arrival date (DD.MM.YYYY): ", "arrival date")?;
        check_date(&arrival)?;
        let transport = self.prompt("Enter transport type: ", "transport type")?;
        let price = self.prompt("Enter ticket price: ", "ticket price")?;
        let price = parse_number("ticket price", &price)?;
        let distance = self.prompt("Enter distance (or leave empty): ", "distance")?;
        let distance = non_blank(distance)
            .map(|d| parse_number("distance", &d))
            .transpose()?;
        let seats = self.prompt("Enter number of available seats: ", "seats")?;
        let seats = parse_seats(&seats)?;
        Ok(NewRoute {
            flight: non_blank(flight),
            source,
            destination,
            departure,
            arrival,
            transport,
            price,
            distance,
            seats,
        })
    }

    fn print_routes(&mut self, table: &Table) -> Result<()> {
        writeln!(self.output, "\nAvailable routes:")?;
        table.render(&mut self.output)?;
        Ok(())
    }

    fn prompt(&mut self, text: &str, field: &'static str) -> Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()?.ok_or(RouteError::UnexpectedEof(field))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn check_date(s: &str) -> Result<()> {
    if is_valid_date(s) {
        Ok(())
    } else {
        Err(RouteError::InvalidDate(s.to_string()))
    }
}

fn invalid_number(field: &'static str, value: &str) -> RouteError {
    RouteError::InvalidNumber {
        field,
        value: value.to_string(),
    }
}

fn parse_number(field: &'static str, s: &str) -> Result<f64> {
    if !is_non_negative_number(s) {
        return Err(invalid_number(field, s));
    }
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid_number(field, s)),
    }
}

fn parse_seats(s: &str) -> Result<i64> {
    if !is_non_negative_integer(s) {
        return Err(invalid_number("seats", s));
    }
    s.parse().map_err(|_| invalid_number("seats", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::QueryCatalog;
    use crate::sqlite::open_in_memory;
    use std::io::Cursor;

    fn repository() -> RouteRepository {
        RouteRepository::new(open_in_memory().unwrap(), QueryCatalog::new())
    }

    fn run(repo: &mut RouteRepository, input: &str, policy: InvalidChoicePolicy) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = Menu::new(repo, Cursor::new(input.as_bytes()), &mut out, policy).run();
        (result, String::from_utf8(out).unwrap())
    }

    const INSERT_A_B: &str = "5\nF1\nA\nB\n01.06.2025\n02.06.2025\nPlane\n100\n50\n20\n";

    #[test]
    fn exit_option_terminates_cleanly() {
        let mut repo = repository();
        let (result, out) = run(&mut repo, "6\n", InvalidChoicePolicy::Exit);
        result.unwrap();
        assert!(out.starts_with("Welcome to the Route Finder!"));
        assert_eq!(out.matches("Choose the operation:").count(), 1);
    }

    #[test]
    fn eof_at_menu_terminates_cleanly() {
        let mut repo = repository();
        let (result, _) = run(&mut repo, "", InvalidChoicePolicy::Exit);
        result.unwrap();
    }

    #[test]
    fn insert_then_search_by_transport() {
        let mut repo = repository();
        let input = format!("{INSERT_A_B}3\nPlane\n6\n");
        let (result, out) = run(&mut repo, &input, InvalidChoicePolicy::Exit);
        result.unwrap();
        assert!(out.contains("Route added successfully."));
        assert!(out.contains("| 01.06.2025 00:00:00 |"));
        assert!(out.contains("| Plane     |"));
    }

    #[test]
    fn filtered_search_with_blank_optionals() {
        let mut repo = repository();
        let input = format!("{INSERT_A_B}2\nA\nB\n01.01.2025\n\n\n6\n");
        let (result, out) = run(&mut repo, &input, InvalidChoicePolicy::Exit);
        result.unwrap();
        let table = out.split("Available routes:").nth(1).unwrap();
        assert!(table.contains("| F1 "));
    }

    #[test]
    fn invalid_choice_exits_by_default() {
        let mut repo = repository();
        let (result, _) = run(&mut repo, "9\n", InvalidChoicePolicy::Exit);
        assert!(matches!(result, Err(RouteError::InvalidChoice(c)) if c == "9"));
    }

    #[test]
    fn invalid_choice_can_reprompt() {
        let mut repo = repository();
        let (result, out) = run(&mut repo, "abc\n1\n6\n", InvalidChoicePolicy::Reprompt);
        result.unwrap();
        assert!(out.contains("Unknown operation 'abc'"));
        assert_eq!(out.matches("Choose the operation:").count(), 3);
        assert!(out.contains("| ID | Flight |"));
    }

    #[test]
    fn invalid_date_is_fatal() {
        let mut repo = repository();
        let (result, _) = run(&mut repo, "2\nA\nB\n31.04.2024\n", InvalidChoicePolicy::Exit);
        assert!(matches!(result, Err(RouteError::InvalidDate(d)) if d == "31.04.2024"));
    }

    #[test]
    fn negative_price_is_fatal() {
        let mut repo = repository();
        let (result, _) = run(&mut repo, "4\n-5\n", InvalidChoicePolicy::Exit);
        assert!(matches!(
            result,
            Err(RouteError::InvalidNumber { field: "ticket price", .. })
        ));
    }

    #[test]
    fn overflowing_price_is_rejected() {
        let mut repo = repository();
        let price = "9".repeat(400);
        let input = format!("5\nF1\nA\nB\n01.06.2025\n02.06.2025\nPlane\n{price}\n50\n20\n");
        let (result, _) = run(&mut repo, &input, InvalidChoicePolicy::Exit);
        assert!(matches!(
            result,
            Err(RouteError::InvalidNumber { field: "ticket price", .. })
        ));
        assert!(repo.show_all_routes().unwrap().is_empty());
    }

    #[test]
    fn overflowing_distance_is_rejected() {
        let mut repo = repository();
        let distance = format!("{}.5", "1".repeat(320));
        let input = format!("5\nF1\nA\nB\n01.06.2025\n02.06.2025\nPlane\n100\n{distance}\n20\n");
        let (result, _) = run(&mut repo, &input, InvalidChoicePolicy::Exit);
        assert!(matches!(result, Err(RouteError::InvalidNumber { field: "distance", .. })));
    }

    #[test]
    fn fractional_seats_are_rejected() {
        let mut repo = repository();
        let input = "5\nF1\nA\nB\n01.06.2025\n02.06.2025\nPlane\n100\n50\n2.5\n";
        let (result, _) = run(&mut repo, input, InvalidChoicePolicy::Exit);
        assert!(matches!(result, Err(RouteError::InvalidNumber { field: "seats", .. })));
        assert!(repo.show_all_routes().unwrap().is_empty());
    }

    #[test]
    fn eof_mid_prompt_is_an_error() {
        let mut repo = repository();
        let (result, _) = run(&mut repo, "3\n", InvalidChoicePolicy::Exit);
        assert!(matches!(result, Err(RouteError::UnexpectedEof("transport type"))));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("exit".parse::<InvalidChoicePolicy>().unwrap(), InvalidChoicePolicy::Exit);
        assert_eq!(" Reprompt ".parse::<InvalidChoicePolicy>().unwrap(), InvalidChoicePolicy::Reprompt);
        assert!("retry".parse::<InvalidChoicePolicy>().is_err());
    }

    #[test]
    fn step_from_terminated_stays_terminated() {
        let mut repo = repository();
        let mut out = Vec::new();
        let mut menu = Menu::new(&mut repo, Cursor::new(&b""[..]), &mut out, InvalidChoicePolicy::Exit);
        assert_eq!(menu.step(MenuState::Terminated).unwrap(), MenuState::Terminated);
    }
}
