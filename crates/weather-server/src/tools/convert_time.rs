use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;
use weather_core::timezone::{convert_time, parse_timezone};

pub struct ConvertTimeTool;

#[async_trait]
impl WeatherTool for ConvertTimeTool {
    fn name(&self) -> &str {
        "convert_time"
    }

    fn description(&self) -> &str {
        "Convert a date and time from one time zone to another"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "datetime_str": {
                    "type": "string",
                    "description": "Datetime in ISO format, e.g. '2024-01-01T12:00:00'"
                },
                "from_timezone": {
                    "type": "string",
                    "description": "Source IANA timezone name"
                },
                "to_timezone": {
                    "type": "string",
                    "description": "Target IANA timezone name"
                }
            },
            "required": ["datetime_str", "from_timezone", "to_timezone"]
        })
    }

    async fn call(&self, args: Value, _ctx: &ToolContext) -> Result<Value, String> {
        let datetime = required_str(&args, "datetime_str")?;
        let from =
            parse_timezone(required_str(&args, "from_timezone")?).map_err(|e| e.to_string())?;
        let to =
            parse_timezone(required_str(&args, "to_timezone")?).map_err(|e| e.to_string())?;

        let conversion = convert_time(datetime, from, to).map_err(|e| e.to_string())?;
        serde_json::to_value(conversion).map_err(|e| e.to_string())
    }
}
