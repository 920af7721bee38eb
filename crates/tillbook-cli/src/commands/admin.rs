//! User and settings commands

use anyhow::Result;

use tillbook_core::models::{NewUser, Role};
use tillbook_core::{Database, Validator};

use super::CLI_USER;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────────────────");
    for u in &users {
        println!(
            "   #{:<3} {:<20} {:<16} {:<6} {}",
            u.id, u.username, u.phone, u.role, u.name
        );
    }
    if users.is_empty() {
        println!("   (none - run 'tillbook init')");
    }
    println!();
    Ok(())
}

pub fn cmd_users_add(
    db: &Database,
    username: &str,
    phone: &str,
    name: &str,
    password: &str,
    admin: bool,
) -> Result<()> {
    let mut v = Validator::new();
    v.username("username", username)
        .phone("phone", phone)
        .required("name", name)
        .password("password", password);
    v.finish()?;

    let role = if admin { Role::Admin } else { Role::User };
    let user = db.create_user(&NewUser {
        phone: phone.to_string(),
        username: username.to_string(),
        name: name.trim().to_string(),
        password: password.to_string(),
        role,
    })?;
    db.log_audit(
        CLI_USER,
        "create",
        Some("user"),
        Some(user.id),
        Some(&format!("username={}, role={}", user.username, user.role)),
    )?;

    println!("✅ Added {} '{}'", user.role, user.username);
    Ok(())
}

pub fn cmd_settings_show(db: &Database) -> Result<()> {
    let s = db.system_settings()?;

    println!();
    println!("⚙️  Settings");
    println!("   ─────────────────────────────");
    println!(
        "   shop_name:           {}",
        s.shop_name.as_deref().unwrap_or("(none)")
    );
    println!("   currency:            {}", s.currency);
    println!("   thousands_separator: '{}'", s.thousands_separator);
    println!("   decimal_separator:   '{}'", s.decimal_separator);
    println!(
        "   logo:                {}",
        if s.logo.is_some() { "(set)" } else { "(none)" }
    );
    for (key, value) in &s.extra {
        println!("   {:<20} {}", format!("{}:", key), value);
    }
    println!();
    Ok(())
}

pub fn cmd_settings_set(db: &Database, key: &str, value: &str) -> Result<()> {
    db.set_setting(key, value.trim())?;
    db.log_audit(
        CLI_USER,
        "update",
        Some("setting"),
        None,
        Some(&format!("{}={}", key, value.trim())),
    )?;
    println!("✅ {} = {}", key, value.trim());
    Ok(())
}
