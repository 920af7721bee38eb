//! Commands against a running server

use anyhow::{Context, Result};

use tillbook_core::{ApiClient, NumberFormat};

use super::{current_period, print_dashboard, Money};

pub async fn cmd_remote_dashboard(
    url: &str,
    login: &str,
    password: &str,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let (this_year, this_month) = current_period();

    let mut client = ApiClient::new(url)?;
    client
        .login(login, password)
        .await
        .with_context(|| format!("Login to {} failed", url))?;

    let dashboard = client
        .dashboard(year.unwrap_or(this_year), Some(month.unwrap_or(this_month)))
        .await
        .context("Failed to fetch dashboard")?;

    let money = Money {
        currency: dashboard.currency.clone(),
        format: NumberFormat::default(),
    };
    print_dashboard(&dashboard, &money);
    Ok(())
}
