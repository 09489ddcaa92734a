use itertools::Itertools;
use tabled::settings::object::Rows;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::application::Application;
use crate::config::{Applications, RunConfig};
use crate::prelude::*;

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Application")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Operations")]
    operations: String,
    #[tabled(rename = "Args")]
    args: String,
}

impl ApplicationRow {
    fn new(position: usize, app: &Application) -> Self {
        let location = match (app.path(), app.path_env()) {
            (Some(path), Some(env)) => format!("${env} or {}", path.display()),
            (Some(path), None) => path.display().to_string(),
            (None, Some(env)) => format!("${env} or builtin"),
            (None, None) => "builtin".to_string(),
        };
        let operations = if app.operations().is_empty() {
            "-".to_string()
        } else {
            app.operations().iter().join("/")
        };

        Self {
            position,
            name: app.name().to_string(),
            location,
            operations,
            args: app.args().to_string(),
        }
    }
}

fn build_applications_table(applications: &Applications) -> String {
    let rows = applications
        .iter()
        .enumerate()
        .map(|(position, app)| ApplicationRow::new(position, app))
        .collect::<Vec<_>>();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

pub fn run(config: &RunConfig) -> Result<()> {
    let applications = config.applications()?;
    info!(
        "{} application(s) configured, binary policy: {:?}",
        applications.len(),
        config.binary_policy
    );
    println!("{}", build_applications_table(&applications));
    Ok(())
}
