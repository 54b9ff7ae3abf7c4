use async_trait::async_trait;
use serde_json::Value;
use weather_core::{Clock, Config, WeatherService};

pub mod convert_time;
pub mod current_datetime;
pub mod current_weather;
pub mod timezone_info;
pub mod weather_details;
pub mod weather_range;

/// Shared dependencies handed to every tool call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub weather: WeatherService,
    pub clock: Clock,
}

impl ToolContext {
    pub fn new(config: Config) -> weather_core::Result<Self> {
        Ok(Self {
            weather: WeatherService::new(config)?,
            clock: Clock::System,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// A tool exposed over MCP.
///
/// `call` returns either a JSON string, which is sent to the client as-is,
/// or any other JSON value, which is pretty-printed.
#[async_trait]
pub trait WeatherTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    async fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn WeatherTool>> {
    vec![
        Box::new(current_weather::CurrentWeatherTool),
        Box::new(weather_range::WeatherRangeTool),
        Box::new(weather_details::WeatherDetailsTool),
        Box::new(current_datetime::CurrentDatetimeTool),
        Box::new(timezone_info::TimezoneInfoTool),
        Box::new(convert_time::ConvertTimeTool),
    ]
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing required argument: {key}"))
}
