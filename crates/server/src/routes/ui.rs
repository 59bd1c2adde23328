//! Single-form HTML page

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::chat::validate_message;
use crate::AppState;
use crate::ai::TextGenerator;
use crate::db::DoctorStore;
use crate::error::AppError;

const MAX_LENGTH_ATTR: usize = 200;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub message: String,
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render(question: &str, answer: Option<&str>) -> Html<String> {
    let answer = answer
        .map(|a| format!("<pre class=\"answer\">{}</pre>", escape_html(a)))
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Medical Chatbot</title>
</head>
<body>
<h1>Medical Chatbot</h1>
<form method="post" action="/ask">
<textarea name="message" rows="3" cols="60" maxlength="{MAX_LENGTH_ATTR}" required>{question}</textarea>
<br>
<button type="submit">Ask</button>
</form>
{answer}
</body>
</html>
"#,
        question = escape_html(question),
    ))
}

/// GET / - Empty question form
pub async fn index() -> Html<String> {
    render("", None)
}

/// POST /ask - Answer a form submission on the same page
pub async fn ask<S, G>(
    State(state): State<AppState<S, G>>,
    Form(form): Form<AskForm>,
) -> Result<Response, AppError>
where
    S: DoctorStore + 'static,
    G: TextGenerator + 'static,
{
    let message = match validate_message(&form.message, state.max_input_chars) {
        Ok(message) => message,
        Err(AppError::BadRequest(reason)) => {
            return Ok((StatusCode::BAD_REQUEST, render(&form.message, Some(&reason))).into_response());
        }
        Err(e) => return Err(e),
    };

    let reply = state.assistant.get_reply(message).await?;
    Ok(render(message, Some(&reply.reply)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_escapes_user_text() {
        let Html(page) = render("<script>", Some("Dr. A & Dr. B"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("Dr. A &amp; Dr. B"));
        assert!(page.contains("maxlength=\"200\""));
    }
}
