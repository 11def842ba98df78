//! Markup compiled into the binary.

use askama::Template;

/// Banner added to the layout when a newer release is known. The label comes
/// from the language catalog and may carry markup.
#[derive(Template)]
#[template(source = r#"<div id="update">{{ label|safe }}</div>"#, ext = "html")]
pub struct UpdateBannerTemplate<'a> {
    pub label: &'a str,
}

/// Standalone page for requests that never reach a module, or whose module
/// failed to render.
#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<link rel="stylesheet" href="/static/styles.css">
</head>
<body>
<div id="error">
<h1>{{ status }}</h1>
<p>{{ message }}</p>
<p><a href="/">{{ title }}</a></p>
</div>
</body>
</html>
"#,
    ext = "html"
)]
pub struct ErrorPageTemplate<'a> {
    pub title: &'a str,
    pub status: u16,
    pub message: &'a str,
}
