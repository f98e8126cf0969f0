//! Server-rendered form page.

use super::routes::MISSING_IDEA_WARNING;
use super::types::RunOutcome;
use crate::util::escape_html;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
textarea { width: 100%; box-sizing: border-box; font: inherit; padding: .5rem; }
button { margin-top: .75rem; padding: .5rem 1.25rem; font: inherit; cursor: pointer; }
.notice { padding: .75rem 1rem; border-radius: 6px; margin: 1rem 0; }
.warning { background: #fff4d6; }
.success { background: #e3f6e8; }
.error { background: #fde2e2; }
pre { background: #f5f5f5; padding: .75rem; overflow-x: auto; }
"#;

/// Render the page, with the result of a submission when there is one.
pub fn render(idea: &str, outcome: Option<&RunOutcome>) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"<form method="post" action="/run">
<label for="idea">💡 Enter your startup idea:</label>
<textarea id="idea" name="idea" rows="4" placeholder="Example: AI mentor for students adapting to syllabus &amp; style.">{}</textarea>
<button type="submit">Run Startup Generator</button>
</form>
"#,
        escape_html(idea)
    ));

    match outcome {
        None => {}
        Some(RunOutcome::MissingIdea) => body.push_str(&notice("warning", MISSING_IDEA_WARNING)),
        Some(RunOutcome::Failed { error, .. }) => {
            body.push_str(&notice("error", &format!("Error: {}", error)))
        }
        Some(RunOutcome::Completed {
            output, mock_ui, ..
        }) => {
            body.push_str(&notice("success", "Done!"));
            body.push_str(&format!(
                concat!(
                    "<label for=\"output\">Crew Output</label>\n",
                    "<textarea id=\"output\" rows=\"20\" readonly>{}</textarea>\n"
                ),
                escape_html(output.raw())
            ));

            for task in &output.tasks_output {
                body.push_str(&format!(
                    "<details><summary>{} ({})</summary><pre>{}</pre></details>\n",
                    escape_html(&task.key),
                    escape_html(&task.agent_role),
                    escape_html(&task.raw)
                ));
            }

            let mock_json = serde_json::to_string_pretty(mock_ui).unwrap_or_default();
            body.push_str(&format!(
                "<h3>Mock UI</h3>\n<pre>{}</pre>\n",
                escape_html(&mock_json)
            ));
            body.push_str(&notice("success", "All tasks completed successfully!"));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Hackathon-in-a-Box</title>
<style>{}</style>
</head>
<body>
<h1>🚀 Hackathon-in-a-Box</h1>
{}</body>
</html>
"#,
        STYLE, body
    )
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        "<div class=\"notice {}\">{}</div>\n",
        kind,
        escape_html(message)
    )
}
