//! Logical column types and their Oracle storage.
//!
//! Oracle has no unsigned, boolean or auto-increment column types, so every
//! integer kind maps to a fixed-precision `number` and booleans to `char(1)`.

use std::fmt;
use std::str::FromStr;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::{fold_many0, separated_list1},
    sequence::{delimited, preceded, tuple},
};
use serde::{Deserialize, Serialize};

use crate::error::OciError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    Char(u32),
    String(u32),
    Text,
    MediumText,
    LongText,
    TinyInteger,
    SmallInteger,
    MediumInteger,
    Integer,
    BigInteger,
    Float,
    Double,
    /// total digits, places
    Decimal(u32, u32),
    Boolean,
    /// Allowed values, enforced by a check constraint.
    Enum(Vec<String>),
    Json,
    Jsonb,
    Date,
    DateTime,
    DateTimeTz,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Year,
    Binary,
    Uuid,
    IpAddress,
    MacAddress,
}

impl ColumnType {
    /// Native Oracle column type.
    pub fn to_oracle_type(&self) -> String {
        match self {
            Self::Char(len) => format!("char({})", len),
            Self::String(len) => format!("varchar2({})", len),
            Self::Text | Self::MediumText | Self::LongText => "clob".to_string(),
            Self::TinyInteger => "number(3,0)".to_string(),
            Self::SmallInteger => "number(5,0)".to_string(),
            Self::MediumInteger => "number(7,0)".to_string(),
            Self::Integer => "number(10,0)".to_string(),
            Self::BigInteger => "number(19,0)".to_string(),
            Self::Float | Self::Double => "number(24,8)".to_string(),
            Self::Decimal(total, places) => format!("number({}, {})", total, places),
            Self::Boolean => "char(1)".to_string(),
            Self::Enum(_) => "varchar2(255)".to_string(),
            Self::Json | Self::Jsonb => "clob".to_string(),
            Self::Date | Self::DateTime | Self::Time => "date".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::DateTimeTz | Self::TimeTz | Self::TimestampTz => {
                "timestamp with time zone".to_string()
            }
            Self::Year => "number(4,0)".to_string(),
            Self::Binary => "blob".to_string(),
            Self::Uuid => "char(36)".to_string(),
            Self::IpAddress => "varchar2(45)".to_string(),
            Self::MacAddress => "varchar2(17)".to_string(),
        }
    }

    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInteger
                | Self::SmallInteger
                | Self::MediumInteger
                | Self::Integer
                | Self::BigInteger
        )
    }

    pub const fn is_lob(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::MediumText | Self::LongText | Self::Json | Self::Jsonb | Self::Binary
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(len) => write!(f, "char({})", len),
            Self::String(len) => write!(f, "string({})", len),
            Self::Text => write!(f, "text"),
            Self::MediumText => write!(f, "medium_text"),
            Self::LongText => write!(f, "long_text"),
            Self::TinyInteger => write!(f, "tiny_integer"),
            Self::SmallInteger => write!(f, "small_integer"),
            Self::MediumInteger => write!(f, "medium_integer"),
            Self::Integer => write!(f, "integer"),
            Self::BigInteger => write!(f, "big_integer"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Decimal(t, p) => write!(f, "decimal({},{})", t, p),
            Self::Boolean => write!(f, "boolean"),
            Self::Enum(allowed) => {
                let quoted: Vec<String> = allowed
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect();
                write!(f, "enum({})", quoted.join(", "))
            }
            Self::Json => write!(f, "json"),
            Self::Jsonb => write!(f, "jsonb"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::DateTimeTz => write!(f, "datetime_tz"),
            Self::Time => write!(f, "time"),
            Self::TimeTz => write!(f, "time_tz"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::TimestampTz => write!(f, "timestamp_tz"),
            Self::Year => write!(f, "year"),
            Self::Binary => write!(f, "binary"),
            Self::Uuid => write!(f, "uuid"),
            Self::IpAddress => write!(f, "ip_address"),
            Self::MacAddress => write!(f, "mac_address"),
        }
    }
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(delimited(multispace0, digit1, multispace0), str::parse)(input)
}

/// `(n)` or `(n, m)`
fn arguments(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    delimited(
        char('('),
        tuple((number, opt(preceded(char(','), number)))),
        char(')'),
    )(input)
}

/// `'...'` with `''` standing for one quote.
fn quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        fold_many0(
            alt((is_not("'"), value("'", tag("''")))),
            String::new,
            |mut acc, part: &str| {
                acc.push_str(part);
                acc
            },
        ),
        char('\''),
    )(input)
}

fn enum_values(input: &str) -> IResult<&str, Vec<String>> {
    preceded(
        tag_no_case("enum"),
        delimited(
            char('('),
            separated_list1(
                char(','),
                delimited(
                    multispace0,
                    alt((quoted, map(is_not(",)' "), |s: &str| s.to_string()))),
                    multispace0,
                ),
            ),
            char(')'),
        ),
    )(input)
}

fn sized(input: &str) -> IResult<&str, (&str, Option<(u32, Option<u32>)>)> {
    tuple((
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        opt(arguments),
    ))(input)
}

fn resolve(name: &str, args: Option<(u32, Option<u32>)>) -> Option<ColumnType> {
    let first = args.map(|(n, _)| n);
    let ty = match name {
        "char" => ColumnType::Char(first.unwrap_or(255)),
        "string" | "varchar" | "varchar2" => ColumnType::String(first.unwrap_or(255)),
        "text" | "clob" => ColumnType::Text,
        "medium_text" | "mediumtext" => ColumnType::MediumText,
        "long_text" | "longtext" => ColumnType::LongText,
        "tiny_integer" | "tinyint" => ColumnType::TinyInteger,
        "small_integer" | "smallint" => ColumnType::SmallInteger,
        "medium_integer" | "mediumint" => ColumnType::MediumInteger,
        "integer" | "int" => ColumnType::Integer,
        "big_integer" | "bigint" => ColumnType::BigInteger,
        "float" => ColumnType::Float,
        "double" => ColumnType::Double,
        "decimal" | "numeric" | "number" => match args {
            Some((total, places)) => ColumnType::Decimal(total, places.unwrap_or(0)),
            None => ColumnType::Decimal(8, 2),
        },
        "boolean" | "bool" => ColumnType::Boolean,
        "json" => ColumnType::Json,
        "jsonb" => ColumnType::Jsonb,
        "date" => ColumnType::Date,
        "datetime" => ColumnType::DateTime,
        "datetime_tz" | "datetimetz" => ColumnType::DateTimeTz,
        "time" => ColumnType::Time,
        "time_tz" | "timetz" => ColumnType::TimeTz,
        "timestamp" => ColumnType::Timestamp,
        "timestamp_tz" | "timestamptz" => ColumnType::TimestampTz,
        "year" => ColumnType::Year,
        "binary" | "blob" => ColumnType::Binary,
        "uuid" => ColumnType::Uuid,
        "ip_address" | "ipaddress" => ColumnType::IpAddress,
        "mac_address" | "macaddress" => ColumnType::MacAddress,
        _ => return None,
    };
    Some(ty)
}

impl FromStr for ColumnType {
    type Err = OciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok((_, allowed)) = all_consuming(enum_values)(s.trim()) {
            return Ok(ColumnType::Enum(allowed));
        }
        let input = s.trim().to_ascii_lowercase();
        let (_, (name, args)) =
            all_consuming(sized)(input.as_str()).map_err(|_| OciError::InvalidType(s.to_string()))?;
        resolve(name, args).ok_or_else(|| OciError::InvalidType(s.to_string()))
    }
}

impl TryFrom<String> for ColumnType {
    type Error = OciError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.to_string()
    }
}
