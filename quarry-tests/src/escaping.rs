use crate::{
    expect_invalid_identifier, expect_unsupported_value, placeholders, unquote_identifier,
    unquote_string,
};
use quarry_core::{QueryInterface, StringEscape, Value};
use rust_decimal::Decimal;
use time::macros::{date, datetime};
use uuid::Uuid;

const STRINGS: &[&str] = &[
    "",
    "plain",
    "a'b",
    "''",
    "Robert'); DROP TABLE students; --",
    "back\\slash",
    "\\'",
    "trailing\\",
    "line\nbreak\r\n",
    "tab\there",
    "\u{8}\u{1A}",
    "what? :name $1 @p ?1",
    "\"double\" `tick` [bracket]",
    "/* comment */ -- comment",
    "ünïcödé 漢字 🦀",
];

pub fn escaping(query: QueryInterface) {
    let descriptor = query.descriptor();
    for value in STRINGS {
        let literal = query
            .escape(&Value::Varchar(value.to_string()))
            .expect("Failed to escape the string");
        assert_eq!(
            unquote_string(descriptor, &literal).as_deref(),
            Some(*value),
            "Literal {literal} does not read back as {value:?}"
        );
        assert!(
            placeholders(descriptor, &literal).is_empty(),
            "Literal {literal} exposes a placeholder"
        );
    }

    // NUL
    let value = Value::Varchar("nul\0inside".into());
    match descriptor.string_escape {
        StringEscape::Standard => crate::silent_logs! {
            expect_unsupported_value(query.escape(&value));
        },
        StringEscape::Backslash => {
            let literal = query.escape(&value).expect("Failed to escape NUL");
            assert_eq!(
                unquote_string(descriptor, &literal).as_deref(),
                Some("nul\0inside")
            );
        }
    }

    // Floats without a literal
    crate::silent_logs! {
        expect_unsupported_value(query.escape(&Value::Float64(f64::NAN)));
        expect_unsupported_value(query.escape(&Value::Float64(f64::INFINITY)));
        expect_unsupported_value(query.escape(&Value::Float64(f64::NEG_INFINITY)));
    }

    // Numbers are written bare
    assert_eq!(query.escape(&Value::Int64(-42)).unwrap(), "-42");
    assert_eq!(
        query.escape(&Value::UInt64(u64::MAX)).unwrap(),
        "18446744073709551615"
    );
    assert_eq!(query.escape(&Value::Float64(1.5)).unwrap(), "1.5");
    assert_eq!(query.escape(&Value::Null).unwrap(), "NULL");

    assert_eq!(
        query.escape(&Value::Decimal(Decimal::new(1250, 2))).unwrap(),
        "12.50"
    );

    // Temporal values carry their text
    let literal = query.escape(&Value::Date(date!(2024 - 03 - 05))).unwrap();
    assert!(literal.contains("2024-03-05"), "{literal}");
    let literal = query
        .escape(&Value::Timestamp(datetime!(2024-03-05 14:30:00.25)))
        .unwrap();
    assert!(literal.contains("2024-03-05 14:30:00.25"), "{literal}");

    // Uuids are strings
    let uuid = Uuid::from_u128(0x67e5504410b1426f9247bb680e5fe0c8);
    assert_eq!(
        query.escape(&Value::Uuid(uuid)).unwrap(),
        query.escape(&Value::Varchar(uuid.to_string())).unwrap()
    );

    // Json documents are string literals
    let json = serde_json::json!({"name": "O'Brien", "tags": ["a\\b"]});
    let literal = query
        .escape(&Value::Json(json.clone()))
        .expect("Failed to escape json");
    let text = unquote_string(descriptor, &literal).expect("Json literal is malformed");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).expect("Json does not parse back"),
        json
    );
}

pub fn identifiers(query: QueryInterface) {
    let descriptor = query.descriptor();
    let names = [
        "plain",
        "with space",
        "MixedCase",
        "quote\"d",
        "back`tick",
        "[bracket]",
        "]]",
        "semi;colon -- comment",
        "ünïcödé",
    ];
    for name in names {
        let quoted = query
            .quote_identifier(name)
            .expect("Failed to quote the identifier");
        assert_eq!(
            unquote_identifier(descriptor, &quoted).as_deref(),
            Some(name),
            "Identifier {quoted} does not read back as {name:?}"
        );
    }
    assert_eq!(
        query.quote_identifiers("sales.orders").unwrap(),
        format!(
            "{}.{}",
            query.quote_identifier("sales").unwrap(),
            query.quote_identifier("orders").unwrap()
        )
    );
    assert_eq!(
        query.quote_identifiers("orders.*").unwrap(),
        format!("{}.*", query.quote_identifier("orders").unwrap())
    );
    crate::silent_logs! {
        expect_invalid_identifier(query.quote_identifier(""));
        expect_invalid_identifier(query.quote_identifier("nul\0"));
        expect_invalid_identifier(query.quote_identifiers("sales..orders"));
    }
}
