use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;
use weather_core::format::range_summary;

pub struct WeatherRangeTool;

#[async_trait]
impl WeatherTool for WeatherRangeTool {
    fn name(&self) -> &str {
        "get_weather_byDateTimeRange"
    }

    fn description(&self) -> &str {
        "Get hourly weather for a city between two dates (inclusive), with a summary \
         of temperature, precipitation and the dominant condition"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of the city to fetch weather information for"
                },
                "start_date": {
                    "type": "string",
                    "description": "Start date in format YYYY-MM-DD"
                },
                "end_date": {
                    "type": "string",
                    "description": "End date in format YYYY-MM-DD"
                }
            },
            "required": ["city", "start_date", "end_date"]
        })
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String> {
        let city = required_str(&args, "city")?;
        let start_date = required_str(&args, "start_date")?;
        let end_date = required_str(&args, "end_date")?;

        let range = ctx
            .weather
            .weather_range(city, start_date, end_date)
            .await
            .map_err(|e| e.to_string())?;

        let summary = range_summary(&range);
        let mut value = serde_json::to_value(&range).map_err(|e| e.to_string())?;
        value["summary"] = serde_json::to_value(summary).map_err(|e| e.to_string())?;
        Ok(value)
    }
}
