use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;
use weather_core::timezone::{parse_timezone, timezone_info};

pub struct TimezoneInfoTool;

#[async_trait]
impl WeatherTool for TimezoneInfoTool {
    fn name(&self) -> &str {
        "get_timezone_info"
    }

    fn description(&self) -> &str {
        "Get a time zone's current local time, UTC offset, abbreviation and DST status"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "timezone_name": {
                    "type": "string",
                    "description": "IANA timezone name (e.g. 'America/New_York', 'Asia/Tokyo')"
                }
            },
            "required": ["timezone_name"]
        })
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String> {
        let name = required_str(&args, "timezone_name")?;
        let tz = parse_timezone(name).map_err(|e| e.to_string())?;
        serde_json::to_value(timezone_info(tz, ctx.clock.now())).map_err(|e| e.to_string())
    }
}
