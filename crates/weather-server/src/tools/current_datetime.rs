use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;
use weather_core::timezone::{current_datetime, parse_timezone};

pub struct CurrentDatetimeTool;

#[async_trait]
impl WeatherTool for CurrentDatetimeTool {
    fn name(&self) -> &str {
        "get_current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time in the specified IANA time zone"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "timezone_name": {
                    "type": "string",
                    "description": "IANA timezone name, e.g. 'America/New_York'. Use UTC if unsure."
                }
            },
            "required": ["timezone_name"]
        })
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String> {
        let name = required_str(&args, "timezone_name")?;
        let tz = parse_timezone(name).map_err(|e| e.to_string())?;
        serde_json::to_value(current_datetime(tz, ctx.clock.now())).map_err(|e| e.to_string())
    }
}
