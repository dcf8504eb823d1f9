//! 产品字段校验
//!
//! 每个字段对应一组有类型的规则，规则自带消息模板，模板中的
//! `:attribute` 替换为字段显示名，`:max` 替换为长度上限。

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::ProductFields;
use crate::core::error::{CoreError, FieldErrors};

/// 名称最大长度
pub const NAME_MAX_CHARS: usize = 80;
/// 描述最大长度
pub const DESCRIPTION_MAX_CHARS: usize = 150;
/// PostgreSQL NUMERIC 小数点前最多位数
pub const NUMERIC_MAX_INTEGER_DIGITS: i64 = 131_072;
/// PostgreSQL NUMERIC 小数点后最多位数
pub const NUMERIC_MAX_SCALE: i64 = 16_383;

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { errors: FieldErrors },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// 校验消息语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// 某一语言下的消息模板
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub required: &'static str,
    pub text: &'static str,
    pub max_chars: &'static str,
    pub numeric: &'static str,
    pub numeric_range: &'static str,
}

impl Locale {
    pub fn messages(self) -> Messages {
        match self {
            Locale::En => Messages {
                required: "The :attribute field is required.",
                text: "The :attribute must be text.",
                max_chars: "The :attribute must not exceed :max characters.",
                numeric: "The :attribute must be numeric.",
                numeric_range: "The :attribute is out of range.",
            },
            Locale::Es => Messages {
                required: "El campo :attribute es requerido.",
                text: "El campo :attribute tiene que ser un texto.",
                max_chars: "El campo :attribute no puede tener más de :max caracteres.",
                numeric: "El campo :attribute tiene que ser un número.",
                numeric_range: "El campo :attribute está fuera de rango.",
            },
        }
    }

    /// 字段显示名
    pub fn label(self, field: &str) -> &'static str {
        match (self, field) {
            (Locale::En, "name") => "Name",
            (Locale::En, "description") => "Description",
            (Locale::En, "price") => "Price",
            (Locale::Es, "name") => "Nombre",
            (Locale::Es, "description") => "Descripción",
            (Locale::Es, "price") => "Precio",
            _ => "field",
        }
    }
}

/// 单条规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Text,
    MaxChars(usize),
    Numeric,
    /// 数值能否存入 NUMERIC 列；非数值交给 `Numeric` 报告
    NumericRange,
}

impl Rule {
    /// 对已存在（非空）的值做检查；`Required` 由调用方单独处理
    fn passes(&self, value: &Value) -> bool {
        match self {
            Rule::Required => !is_blank(Some(value)),
            Rule::Text => value.is_string(),
            Rule::MaxChars(max) => measure(value) <= *max,
            Rule::Numeric => numeric_text(value).is_some(),
            Rule::NumericRange => numeric_text(value).is_none() || parse_decimal(value).is_some(),
        }
    }

    fn template(&self, messages: &Messages) -> &'static str {
        match self {
            Rule::Required => messages.required,
            Rule::Text => messages.text,
            Rule::MaxChars(_) => messages.max_chars,
            Rule::Numeric => messages.numeric,
            Rule::NumericRange => messages.numeric_range,
        }
    }
}

/// 规则及其消息模板
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub template: &'static str,
}

impl Check {
    fn message(&self, label: &str) -> String {
        let message = self.template.replace(":attribute", label);
        match self.rule {
            Rule::MaxChars(max) => message.replace(":max", &max.to_string()),
            _ => message,
        }
    }
}

/// 一个字段的全部规则
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub checks: Vec<Check>,
}

impl FieldRule {
    fn new(field: &'static str, locale: Locale, rules: &[Rule]) -> Self {
        let messages = locale.messages();
        Self {
            field,
            label: locale.label(field),
            checks: rules
                .iter()
                .map(|rule| Check {
                    rule: *rule,
                    template: rule.template(&messages),
                })
                .collect(),
        }
    }

    fn errors(&self, value: Option<&Value>) -> Vec<String> {
        let value = match value {
            Some(value) if !is_blank(Some(value)) => value,
            // 缺失的字段只报告 required，不再做类型和长度检查
            _ => {
                return self
                    .checks
                    .iter()
                    .filter(|check| check.rule == Rule::Required)
                    .map(|check| check.message(self.label))
                    .collect();
            }
        };

        self.checks
            .iter()
            .filter(|check| !check.rule.passes(value))
            .map(|check| check.message(self.label))
            .collect()
    }
}

/// 产品校验器
#[derive(Debug, Clone)]
pub struct ProductValidator {
    locale: Locale,
    fields: Vec<FieldRule>,
}

impl Default for ProductValidator {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl ProductValidator {
    pub fn new(locale: Locale) -> Self {
        let fields = vec![
            FieldRule::new(
                "name",
                locale,
                &[Rule::Required, Rule::Text, Rule::MaxChars(NAME_MAX_CHARS)],
            ),
            FieldRule::new(
                "description",
                locale,
                &[
                    Rule::Required,
                    Rule::Text,
                    Rule::MaxChars(DESCRIPTION_MAX_CHARS),
                ],
            ),
            FieldRule::new(
                "price",
                locale,
                &[Rule::Required, Rule::Numeric, Rule::NumericRange],
            ),
        ];

        Self { locale, fields }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// 校验原始字段，收集所有字段的全部错误
    pub fn validate(&self, input: &Map<String, Value>) -> ValidationResult {
        let errors: FieldErrors = self
            .fields
            .iter()
            .filter_map(|field_rule| {
                let messages = field_rule.errors(input.get(field_rule.field));
                (!messages.is_empty()).then(|| (field_rule.field.to_string(), messages))
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { errors }
        }
    }

    /// 校验并提取写入字段
    pub fn check(&self, input: &Map<String, Value>) -> Result<ProductFields, CoreError> {
        if let ValidationResult::Invalid { errors } = self.validate(input) {
            return Err(CoreError::Validation(errors));
        }

        let text = |field: &str| {
            input
                .get(field)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| CoreError::InternalServerError(format!("字段 {} 提取失败", field)))
        };

        let price = input
            .get("price")
            .and_then(parse_decimal)
            .ok_or_else(|| CoreError::InternalServerError("字段 price 提取失败".to_string()))?;

        Ok(ProductFields {
            name: text("name")?,
            description: text("description")?,
            price,
        })
    }
}

/// 缺失、null、空白字符串、空数组和空对象都视为未提供
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// 长度：字符串按字符计，数组和对象按元素计，其余按 JSON 文本计
fn measure(value: &Value) -> usize {
    match value {
        Value::String(s) => s.trim().chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => other.to_string().chars().count(),
    }
}

/// 数字或数字字符串的文本形式（仅做语法检查）
fn numeric_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    is_numeric_literal(&text).then_some(text)
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`，小数点两侧至少一侧有数字
fn is_numeric_literal(text: &str) -> bool {
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mantissa_ok = !(int.is_empty() && frac.is_empty()) && digits(int) && digits(frac);
    let exponent_ok = exponent.map_or(true, |e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && digits(e)
    });

    mantissa_ok && exponent_ok
}

/// 解析数值，超出 NUMERIC 范围或无法表示时返回 `None`
pub fn parse_decimal(value: &Value) -> Option<BigDecimal> {
    let text = numeric_text(value)?;

    // 指数位数过多时必然超出范围
    let exponent_digits = text.find(['e', 'E']).map_or(0, |pos| {
        text[pos + 1..].trim_start_matches(['+', '-', '0']).len()
    });
    if exponent_digits > 9 {
        return None;
    }

    BigDecimal::from_str(&text)
        .ok()
        .filter(in_numeric_range)
}

/// 按 PostgreSQL NUMERIC 的位数上限判断
fn in_numeric_range(value: &BigDecimal) -> bool {
    let (digits, scale) = value.as_bigint_and_exponent();
    let digits = digits.to_string().trim_start_matches('-').len() as i64;

    scale <= NUMERIC_MAX_SCALE && digits - scale <= NUMERIC_MAX_INTEGER_DIGITS
}
