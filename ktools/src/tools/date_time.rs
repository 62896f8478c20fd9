use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};

use crate::common::{CONFIDENCE_LEVELS, Confidence, TextReport, completion, or_placeholder};

const QUERY_TYPES: &[&str] = &["date-to-info", "day-to-dates"];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// What the user wants to know about the calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum DateTimeQuery {
    /// Everything about one day.
    DateInfo { year: i32, month: u32, day: u32 },
    /// Every date in a month that falls on `weekday`.
    DayToDates {
        year: i32,
        month: u32,
        weekday: String,
    },
}

impl DateTimeQuery {
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self::DateInfo { year, month, day }
    }

    pub fn weekdays_in(year: i32, month: u32, weekday: impl Into<String>) -> Self {
        Self::DayToDates {
            year,
            month,
            weekday: weekday.into(),
        }
    }

    pub fn query_type(&self) -> QueryType {
        match self {
            Self::DateInfo { .. } => QueryType::DateToInfo,
            Self::DayToDates { .. } => QueryType::DayToDates,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let (year, month) = match self {
            Self::DateInfo { year, month, .. } | Self::DayToDates { year, month, .. } => {
                (*year, *month)
            }
        };
        if month_name(month).is_none() {
            return Err(format!("month {month} is outside 1..=12"));
        }
        match self {
            Self::DateInfo { day, .. } if *day == 0 || *day > days_in_month(year, month) => {
                Err(format!("day {day} does not exist in {year}-{month:02}"))
            }
            Self::DayToDates { weekday, .. } if canonical_weekday(weekday).is_none() => {
                Err(format!("unknown day of the week `{}`", weekday.trim()))
            }
            _ => Ok(()),
        }
    }
}

fn canonical_weekday(value: &str) -> Option<&'static str> {
    let value = value.trim();
    WEEKDAY_NAMES
        .into_iter()
        .find(|name| name.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryType {
    #[serde(rename = "date-to-info")]
    DateToInfo,
    #[serde(rename = "day-to-dates")]
    DayToDates,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateToInfo => "date-to-info",
            Self::DayToDates => "day-to-dates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateInfo {
    pub formatted_date: String,
    pub day_of_week: String,
    pub day_number: u32,
    pub month_name: String,
    pub year: i32,
    pub century: String,
    pub millennium: String,
    #[serde(default)]
    pub julian_day: Option<f64>,
    #[serde(default)]
    pub historical_events: Vec<String>,
    #[serde(default)]
    pub astronomical_info: Vec<String>,
    #[serde(default)]
    pub cultural_significance: Vec<String>,
    pub season: String,
    #[serde(default)]
    pub zodiac_sign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingDates {
    pub month_name: String,
    pub year: i32,
    pub day_of_week: String,
    pub dates: Vec<u32>,
    pub total_count: u32,
    pub formatted_dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeReport {
    pub query_type: QueryType,
    #[serde(default)]
    pub date_info: Option<DateInfo>,
    #[serde(default)]
    pub matching_dates: Option<MatchingDates>,
    pub calculation_method: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub historical_accuracy_note: Option<String>,
    pub disclaimer: String,
}

impl Contract for DateTimeReport {
    fn shape() -> ShapeDescriptor {
        let date_info = ShapeDescriptor::new()
            .required("formatted_date", FieldKind::String)
            .required("day_of_week", FieldKind::String)
            .required("day_number", FieldKind::Number)
            .required("month_name", FieldKind::String)
            .required("year", FieldKind::Number)
            .required("century", FieldKind::String)
            .required("millennium", FieldKind::String)
            .optional("julian_day", FieldKind::Number)
            .optional("historical_events", FieldKind::array_of(FieldKind::String))
            .optional("astronomical_info", FieldKind::array_of(FieldKind::String))
            .optional("cultural_significance", FieldKind::array_of(FieldKind::String))
            .required("season", FieldKind::String)
            .optional("zodiac_sign", FieldKind::String);
        let matching = ShapeDescriptor::new()
            .required("month_name", FieldKind::String)
            .required("year", FieldKind::Number)
            .required("day_of_week", FieldKind::String)
            .required("dates", FieldKind::array_of(FieldKind::Number))
            .required("total_count", FieldKind::Number)
            .required("formatted_dates", FieldKind::array_of(FieldKind::String));

        ShapeDescriptor::new()
            .required("query_type", FieldKind::Enum(QUERY_TYPES))
            .optional("date_info", FieldKind::Object(date_info))
            .optional("matching_dates", FieldKind::Object(matching))
            .required("calculation_method", FieldKind::String)
            .required("confidence", FieldKind::Enum(CONFIDENCE_LEVELS))
            .optional("historical_accuracy_note", FieldKind::String)
            .required("disclaimer", FieldKind::String)
    }

    /// The answer block must match the declared query type.
    fn check(&self) -> Result<(), ContractError> {
        match self.query_type {
            QueryType::DateToInfo if self.date_info.is_none() => {
                Err(ContractError::missing_field("date_info"))
            }
            QueryType::DayToDates => match &self.matching_dates {
                None => Err(ContractError::missing_field("matching_dates")),
                Some(found) if found.total_count as usize != found.dates.len() => {
                    Err(ContractError::constraint(
                        "matching_dates.total_count",
                        format!(
                            "{} does not match the {} dates listed",
                            found.total_count,
                            found.dates.len()
                        ),
                    ))
                }
                Some(_) => Ok(()),
            },
            QueryType::DateToInfo => Ok(()),
        }
    }
}

impl DateTimeReport {
    pub fn to_text_report(&self) -> String {
        let mut report = TextReport::new("Date & Time Report")
            .field("Query Type", self.query_type.as_str())
            .field("Confidence", self.confidence.as_str())
            .gap();

        if let Some(info) = &self.date_info {
            report = report
                .field("Date", &info.formatted_date)
                .field("Day of Week", &info.day_of_week)
                .field("Century", &info.century)
                .field("Millennium", &info.millennium)
                .field("Season", &info.season)
                .field(
                    "Zodiac Sign",
                    or_placeholder(info.zodiac_sign.as_deref(), "Not applicable"),
                )
                .gap()
                .list("Historical Events", &info.historical_events)
                .list("Astronomical Information", &info.astronomical_info)
                .list("Cultural Significance", &info.cultural_significance);
        }

        if let Some(found) = &self.matching_dates {
            report = report
                .field("Month", format!("{} {}", found.month_name, found.year))
                .field("Day of Week", &found.day_of_week)
                .field("Total", found.total_count.to_string())
                .gap()
                .list("Matching Dates", &found.formatted_dates);
        }

        report = report.section("Calculation Method", &self.calculation_method);
        if let Some(note) = &self.historical_accuracy_note {
            report = report.section("Historical Accuracy", note);
        }
        report.finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone)]
pub struct DateTimeCheckerTool {
    query: DateTimeQuery,
    options: RequestOptions,
}

impl DateTimeCheckerTool {
    pub fn new(query: DateTimeQuery) -> Self {
        Self {
            query,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self) -> Prompt {
        match &self.query {
            DateTimeQuery::DateInfo { year, month, day } => Prompt::new(format!(
                "You are an AI assistant specialized in calendar calculations and historical date analysis.\n\
Analyze the date: {day}/{month}/{year} ({year:04}-{month:02}-{day:02})\n\n\
Provide the day of the week, historical and cultural significance, astronomical \
information and calendar system details.\n\n\
Return your analysis in a JSON object with these keys:\n\
- \"query_type\": \"date-to-info\"\n\
- \"date_info\": (object) with \"formatted_date\", \"day_of_week\", \"day_number\" ({day}), \
\"month_name\", \"year\" ({year}), \"century\", \"millennium\", \"julian_day\" (number, if calculable), \
\"historical_events\", \"astronomical_info\", \"cultural_significance\" (arrays of strings), \
\"season\" (Northern Hemisphere) and \"zodiac_sign\"\n\
- \"calculation_method\": (string) How the day was calculated\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\")\n\
- \"historical_accuracy_note\": (string) Note about historical calendar accuracy\n\
- \"disclaimer\": (string) Standard disclaimer about AI calculations"
            )),
            DateTimeQuery::DayToDates {
                year,
                month,
                weekday,
            } => {
                let month_name = month_name(*month).unwrap_or_default();
                let weekday = canonical_weekday(weekday).unwrap_or_default();
                Prompt::new(format!(
                    "You are an AI assistant specialized in calendar calculations.\n\
Find all dates in {month_name} {year} that fall on a {weekday}.\n\n\
Return your analysis in a JSON object with these keys:\n\
- \"query_type\": \"day-to-dates\"\n\
- \"matching_dates\": (object) with \"month_name\" (\"{month_name}\"), \"year\" ({year}), \
\"day_of_week\" (\"{weekday}\"), \"dates\" (array of day numbers), \"total_count\" (number of \
{weekday}s in the month) and \"formatted_dates\" (array of full date strings)\n\
- \"calculation_method\": (string) How the dates were calculated\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\")\n\
- \"disclaimer\": (string) Standard disclaimer about AI calculations"
                ))
            }
        }
    }
}

impl Tool for DateTimeCheckerTool {
    type Output = DateTimeReport;

    fn kind(&self) -> &'static str {
        "date_time_checker"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.query.validate()
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("calendar", request).await
        })
    }
}
