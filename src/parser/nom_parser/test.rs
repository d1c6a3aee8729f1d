use super::*;

#[test]
fn test_native_type() {
    assert_eq!(native_type("int"), Ok(("", TypeSpelling::named("int"))));

    assert_eq!(
        native_type("unsigned long long"),
        Ok((
            "",
            TypeSpelling {
                sign: Some(Sign::Unsigned),
                name: "long long".to_owned(),
                ..TypeSpelling::default()
            }
        ))
    );

    assert_eq!(
        native_type("const char*"),
        Ok((
            "",
            TypeSpelling {
                is_const: true,
                name: "char".to_owned(),
                pointer: 1,
                ..TypeSpelling::default()
            }
        ))
    );

    assert_eq!(
        native_type("game::Player &"),
        Ok((
            "",
            TypeSpelling {
                name: "game::Player".to_owned(),
                reference: true,
                ..TypeSpelling::default()
            }
        ))
    );
}

#[test]
fn test_template() {
    assert_eq!(
        native_type("behaviac::vector<float>"),
        Ok((
            "",
            TypeSpelling {
                name: "behaviac::vector".to_owned(),
                args: vec![TypeSpelling::named("float")],
                ..TypeSpelling::default()
            }
        ))
    );

    assert_eq!(
        native_type("vector<vector<int> >"),
        Ok((
            "",
            TypeSpelling {
                name: "vector".to_owned(),
                args: vec![TypeSpelling {
                    name: "vector".to_owned(),
                    args: vec![TypeSpelling::named("int")],
                    ..TypeSpelling::default()
                }],
                ..TypeSpelling::default()
            }
        ))
    );
}

#[test]
fn test_scalar_literal() {
    assert_eq!(literal("12"), Ok(("", RawLiteral::Scalar("12".to_owned()))));
    assert_eq!(
        literal(" 1.5f "),
        Ok(("", RawLiteral::Scalar("1.5f".to_owned())))
    );
}

#[test]
fn test_array_literal() {
    assert_eq!(
        literal("3:1|2|3"),
        Ok((
            "",
            RawLiteral::Array(vec![
                RawLiteral::Scalar("1".to_owned()),
                RawLiteral::Scalar("2".to_owned()),
                RawLiteral::Scalar("3".to_owned()),
            ])
        ))
    );

    assert_eq!(literal("0:"), Ok(("", RawLiteral::Array(vec![]))));
}

#[test]
fn test_struct_literal() {
    assert_eq!(
        literal("{x=1;y=2.5;}"),
        Ok((
            "",
            RawLiteral::Struct(vec![
                ("x".to_owned(), RawLiteral::Scalar("1".to_owned())),
                ("y".to_owned(), RawLiteral::Scalar("2.5".to_owned())),
            ])
        ))
    );

    assert_eq!(
        literal("{pos={x=1;y=2;};ids=2:4|5;}"),
        Ok((
            "",
            RawLiteral::Struct(vec![
                (
                    "pos".to_owned(),
                    RawLiteral::Struct(vec![
                        ("x".to_owned(), RawLiteral::Scalar("1".to_owned())),
                        ("y".to_owned(), RawLiteral::Scalar("2".to_owned())),
                    ])
                ),
                (
                    "ids".to_owned(),
                    RawLiteral::Array(vec![
                        RawLiteral::Scalar("4".to_owned()),
                        RawLiteral::Scalar("5".to_owned()),
                    ])
                ),
            ])
        ))
    );
}
