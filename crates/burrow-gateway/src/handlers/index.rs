use axum::response::Html;

const FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>URL Shortener</title>
</head>
<body>
    <h2>Shorten a URL</h2>
    <form method="post" action="/shorten">
        <label for="long_url">Enter URL:</label>
        <input type="text" id="long_url" name="long_url" required>
        <button type="submit">Shorten</button>
    </form>
</body>
</html>
"#;

pub async fn index_handler() -> Html<&'static str> {
    Html(FORM)
}
