//! HTML pages served by the demo.

/// Landing page linking to every demo route.
pub const INDEX: &str = r#"<html>
    <head><title>Web Framework Example</title></head>
    <body>
        <h1>Welcome to the Web Framework!</h1>
        <ul>
            <li><a href="/hello">Hello Page</a></li>
            <li><a href="/users">Users API</a></li>
            <li><a href="/form">Form Example</a></li>
        </ul>
    </body>
</html>
"#;

/// Form posting `name` and `email` back to `/form`.
pub const FORM: &str = r#"<html>
    <head><title>Form Example</title></head>
    <body>
        <h1>Submit Data</h1>
        <form method="POST" action="/form">
            <label>Name:</label><br>
            <input type="text" name="name"><br><br>
            <label>Email:</label><br>
            <input type="email" name="email"><br><br>
            <button type="submit">Submit</button>
        </form>
        <a href="/">Back to home</a>
    </body>
</html>
"#;

/// Shown when a form submission is missing a field.
pub const FORM_REJECTED: &str = r#"<html>
    <head><title>400 Bad Request</title></head>
    <body>
        <h1>400 Bad Request</h1>
        <a href="/form">Back to the form</a>
    </body>
</html>
"#;

/// Greeting page for `name`.
#[must_use]
pub fn hello(name: &str) -> String {
    format!(
        r#"<html>
    <head><title>Hello</title></head>
    <body>
        <h1>Hello, {}!</h1>
        <a href="/">Back to home</a>
    </body>
</html>
"#,
        escape(name)
    )
}

/// Confirmation page after a successful form submission.
#[must_use]
pub fn form_submitted(name: &str, email: &str) -> String {
    format!(
        r#"<html>
    <head><title>Form Submitted</title></head>
    <body>
        <h1>Form Submitted Successfully!</h1>
        <p>Name: {}</p>
        <p>Email: {}</p>
        <a href="/form">Submit another</a> | <a href="/">Home</a>
    </body>
</html>
"#,
        escape(name),
        escape(email)
    )
}

/// Escape text for inclusion in HTML element content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
