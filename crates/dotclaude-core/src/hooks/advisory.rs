//! PreToolUse advisory: when the assistant is about to use the trigger tool
//! (by default `WebFetch`), remind it that the fetched page arrives as a lossy
//! summary and how to get the raw content instead. Never blocks the call.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::HookOutput;

#[derive(Deserialize)]
struct EventHead {
    #[serde(default)]
    tool_name: Option<String>,
}

#[derive(Deserialize)]
struct ToolEvent {
    #[serde(default, alias = "tool_input")]
    parameters: Option<Map<String, Value>>,
}

pub fn evaluate(input: &str, trigger: &str) -> HookOutput {
    let head: EventHead = match serde_json::from_str(input) {
        Ok(h) => h,
        Err(e) => {
            tracing::debug!("advisory: unparsable input: {e}");
            return HookOutput::noop();
        }
    };
    if head.tool_name.as_deref() != Some(trigger) {
        return HookOutput::noop();
    }

    let event: ToolEvent = match serde_json::from_str(input) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::debug!("advisory: bad parameters: {e}");
            return HookOutput::noop();
        }
    };
    let params = event.parameters.unwrap_or_default();
    let url = param(&params, "url");
    let prompt = param(&params, "prompt");

    HookOutput::context(advisory_text(trigger, &url, &prompt))
}

/// String values verbatim, other JSON values as JSON text, absent as "".
fn param(params: &Map<String, Value>, key: &str) -> String {
    match params.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn advisory_text(tool: &str, url: &str, prompt: &str) -> String {
    format!(
        "{tool} will answer \"{prompt}\" from a model-written summary of {url}, not the page itself. \
Exact wording, code blocks and version numbers can be lost or paraphrased. \
If the answer must be verbatim, read the raw page with `curl -sL '{url}'` instead, \
or ask the prompt to quote the relevant section word for word."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_of(out: &HookOutput) -> Option<&str> {
        out.hook_specific_output
            .as_ref()
            .and_then(|h| h.additional_context.as_deref())
    }

    #[test]
    fn other_tool_is_noop() {
        let out = evaluate(r#"{"tool_name":"Bash","parameters":{"command":"ls"}}"#, "WebFetch");
        assert_eq!(out, HookOutput::noop());
    }

    #[test]
    fn malformed_input_is_noop() {
        for input in ["", "not json", "[1,2]", r#"{"tool_name": 7}"#] {
            assert_eq!(evaluate(input, "WebFetch"), HookOutput::noop(), "{input}");
        }
    }

    #[test]
    fn matching_tool_embeds_url_and_prompt() {
        let input = json!({
            "tool_name": "WebFetch",
            "parameters": {"url": "https://example.com", "prompt": "Q?"}
        })
        .to_string();
        let out = evaluate(&input, "WebFetch");
        let text = context_of(&out).unwrap();
        assert!(text.contains("https://example.com"));
        assert!(text.contains("Q?"));
        assert_eq!(out.decision, None);
        assert_eq!(out.reason, None);
    }

    #[test]
    fn tool_input_alias_is_accepted() {
        let input = json!({
            "tool_name": "WebFetch",
            "tool_input": {"url": "https://docs.rs", "prompt": "version?"}
        })
        .to_string();
        let out = evaluate(&input, "WebFetch");
        assert!(context_of(&out).unwrap().contains("https://docs.rs"));
    }

    #[test]
    fn missing_parameters_default_to_empty() {
        let out = evaluate(r#"{"tool_name":"WebFetch"}"#, "WebFetch");
        assert_eq!(context_of(&out).unwrap(), advisory_text("WebFetch", "", ""));
    }

    #[test]
    fn non_string_parameter_rendered_as_json() {
        let input = r#"{"tool_name":"WebFetch","parameters":{"url":42,"prompt":null}}"#;
        let out = evaluate(input, "WebFetch");
        assert_eq!(context_of(&out).unwrap(), advisory_text("WebFetch", "42", ""));
    }

    #[test]
    fn custom_trigger() {
        let input = r#"{"tool_name":"WebSearch","parameters":{}}"#;
        assert_eq!(evaluate(input, "WebFetch"), HookOutput::noop());
        assert!(context_of(&evaluate(input, "WebSearch")).is_some());
    }
}
