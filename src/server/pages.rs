// file: src/server/pages.rs
// description: html views for login, faculty and admin dashboards

use crate::models::UploadLogRecord;
use crate::session::SessionContext;
use crate::utils::{PageTemplate, escape_html};

const LAYOUT: PageTemplate = PageTemplate::new(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body { font-family: -apple-system, BlinkMacSystemFont, sans-serif; margin: 2rem auto; max-width: 760px; padding: 0 1rem; color: #222; }
  form { margin: 1rem 0; }
  input { display: block; margin: 0.4rem 0; padding: 0.4rem; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #ccc; padding: 0.3rem 0.5rem; text-align: left; }
  .error { color: #b00020; }
  .success { color: #1b5e20; }
  .sidebar { background: #f4f4f4; padding: 0.5rem 1rem; }
</style>
</head>
<body>
{body}
</body>
</html>
"#,
);

const LOGIN: PageTemplate = PageTemplate::new(
    r#"<h1>Faculty Login</h1>
{message}
<form method="post" action="/login">
  <label>Username <input name="username" autocomplete="username" required></label>
  <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
  <button type="submit">Login</button>
</form>
"#,
);

const DASHBOARD: PageTemplate = PageTemplate::new(
    r#"<div class="sidebar">
  <p>Welcome</p>
  <p>Logged in as: {username} ({role})</p>
  <form method="post" action="/logout"><button type="submit">Logout</button></form>
</div>
<h1>AI-Based CO &amp; Bloom's Verifier</h1>
<form method="post" action="/reports" enctype="multipart/form-data">
  <label>Upload Question Paper CSV <input name="file" type="file" accept=".csv" required></label>
  <button type="submit">Download Report</button>
  <button type="submit" formaction="/reports/preview">Preview</button>
</form>
{admin_section}
"#,
);

const ADMIN_SECTION: PageTemplate = PageTemplate::new(
    r#"<h2>Admin Dashboard</h2>
<h3>Add Faculty User</h3>
{flash}
<form method="post" action="/admin/users">
  <label>New Faculty Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Add Faculty</button>
</form>
<h3>Upload Log History</h3>
<table>
  <thead><tr><th>username</th><th>timestamp</th><th>filename</th></tr></thead>
  <tbody>
{log_rows}
  </tbody>
</table>
"#,
);

const TITLE: &str = "CO Verifier";

pub fn login_page(error: Option<&str>) -> String {
    let message = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    let body = LOGIN.render(&[("message", message.as_str())]);
    LAYOUT.render(&[("title", TITLE), ("body", body.as_str())])
}

/// Faculty see the upload form. Admins additionally get user management and
/// the upload history, which must be passed in `logs`.
pub fn dashboard_page(
    session: &SessionContext,
    logs: Option<&[UploadLogRecord]>,
    flash: Option<&str>,
) -> String {
    let admin_section = match logs {
        Some(logs) if session.is_admin() => admin_section(logs, flash),
        _ => String::new(),
    };

    let username = escape_html(&session.username);
    let body = DASHBOARD.render(&[
        ("username", username.as_str()),
        ("role", session.role.as_str()),
        ("admin_section", admin_section.as_str()),
    ]);
    LAYOUT.render(&[("title", TITLE), ("body", body.as_str())])
}

fn admin_section(logs: &[UploadLogRecord], flash: Option<&str>) -> String {
    let flash = flash
        .map(|f| format!(r#"<p class="success">{}</p>"#, escape_html(f)))
        .unwrap_or_default();

    let log_rows: String = logs
        .iter()
        .map(|log| {
            format!(
                "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&log.username),
                escape_html(&log.timestamp),
                escape_html(&log.filename)
            )
        })
        .collect();

    ADMIN_SECTION.render(&[("flash", flash.as_str()), ("log_rows", log_rows.as_str())])
}
