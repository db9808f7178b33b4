#[cfg(test)]
mod parser_tests {
    use calcparse as calc;

    use calc::ast::{Expression, Node, Operator, Statement};
    use calc::error::ParseError;
    use calc::parse_statement;

    /// Prefix rendering of an expression, ignoring spans.
    fn sexpr(node: &Node<'_>) -> String {
        match node.value() {
            Expression::Number(n) => n.to_string(),

            Expression::Call { name, args: None } => name.value().to_string(),

            Expression::Call {
                name,
                args: Some(args),
            } => {
                let mut s = format!("({}", name.value());
                for arg in args {
                    s.push(' ');
                    s.push_str(&sexpr(arg));
                }
                s.push(')');
                s
            }

            Expression::Binary {
                left,
                operator,
                right,
            } => format!("({} {} {})", operator.value(), sexpr(left), sexpr(right)),
        }
    }

    /// Evaluates number-only trees.
    fn eval(node: &Node<'_>) -> f64 {
        match node.value() {
            Expression::Number(n) => *n,

            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let (l, r) = (eval(left), eval(right));
                match operator.value() {
                    Operator::Add => l + r,
                    Operator::Sub => l - r,
                    Operator::Mul => l * r,
                    Operator::Div => l / r,
                    Operator::Pow => l.powf(r),
                    Operator::Mod => l % r,
                }
            }

            Expression::Call { .. } => panic!("cannot evaluate a call"),
        }
    }

    fn parse_eval(source: &str) -> Node<'_> {
        match parse_statement(source) {
            Ok(Statement::Eval(node)) => node,
            other => panic!("expected Eval for {:?}, got {:?}", source, other),
        }
    }

    /// Re-parses every node's captured text and checks it yields the same tree.
    fn assert_span_consistent(node: &Node<'_>) {
        let text = node.span().text();
        let reparsed = parse_eval(text);

        assert_eq!(
            sexpr(&reparsed),
            sexpr(node),
            "span text {:?} does not reproduce its node",
            text
        );

        match node.value() {
            Expression::Number(_) => {}

            Expression::Call { name, args } => {
                assert_eq!(name.span().text(), *name.value());

                for arg in args.iter().flatten() {
                    assert_span_consistent(arg);
                }
            }

            Expression::Binary {
                left,
                operator,
                right,
            } => {
                assert_eq!(operator.span().text(), operator.value().to_string());
                assert_span_consistent(left);
                assert_span_consistent(right);
            }
        }
    }

    #[test]
    fn test_number_literals_round_trip() {
        let literals = [
            "0",
            "7",
            "42",
            "3.14",
            "0.5",
            "1e3",
            "2.5e-1",
            "6.02E+23",
            "1E-7",
            "123456789.125",
        ];

        for literal in literals {
            let node = parse_eval(literal);
            let expected: f64 = literal.parse().unwrap();

            assert_eq!(node.value(), &Expression::Number(expected));
            assert_eq!(node.span().text(), literal);

            // re-parsing the captured text yields the same value
            let again = parse_eval(node.span().text());
            assert_eq!(again.value(), node.value());
        }
    }

    #[test]
    fn test_mul_binds_tighter_than_sub() {
        let node = parse_eval("1-2*3");

        assert_eq!(sexpr(&node), "(- 1 (* 2 3))");
        assert_eq!(eval(&node), -5.0);
    }

    #[test]
    fn test_sub_after_add_groups_right_by_rank() {
        let node = parse_eval("1+2-3");

        assert_eq!(sexpr(&node), "(+ 1 (- 2 3))");
        assert_eq!(eval(&node), 2.0);
    }

    #[test]
    fn test_rank_table_grouping() {
        let cases = [
            ("1-2+3", "(+ (- 1 2) 3)"),
            ("8/2*2", "(* (/ 8 2) 2)"),
            ("8*2/4", "(* 8 (/ 2 4))"),
            ("2^3^2", "(^ (^ 2 3) 2)"),
            ("7%3^2", "(^ (% 7 3) 2)"),
            ("1+2+3", "(+ (+ 1 2) 3)"),
            ("1 + 2*3 - 4 / 2", "(+ 1 (- (* 2 3) (/ 4 2)))"),
            ("(1+2)*3", "(* (+ 1 2) 3)"),
            ("((4))", "4"),
        ];

        for (source, expected) in cases {
            assert_eq!(sexpr(&parse_eval(source)), expected, "grouping of {:?}", source);
        }
    }

    #[test]
    fn test_function_assignment() {
        let statement = parse_statement("f(x,y)=x+y").unwrap();

        let Statement::Assign {
            name,
            params,
            value,
        } = &statement
        else {
            panic!("expected Assign, got {:?}", statement);
        };

        assert_eq!(*name.value(), "f");

        let params: Vec<&str> = params
            .as_ref()
            .expect("parameter list")
            .iter()
            .map(|p| *p.value())
            .collect();
        assert_eq!(params, ["x", "y"]);

        assert_eq!(sexpr(value), "(+ x y)");
        assert!(matches!(
            value.value(),
            Expression::Binary { left, .. }
                if matches!(left.value(), Expression::Call { args: None, .. })
        ));
        assert_eq!(statement.target().map(|n| *n.value()), Some("f"));
    }

    #[test]
    fn test_variable_assignment() {
        let statement = parse_statement("  rate = 2 * base ").unwrap();

        match &statement {
            Statement::Assign {
                name,
                params: None,
                value,
            } => {
                assert_eq!(*name.value(), "rate");
                assert_eq!(name.span().start(), 2);
                assert_eq!(sexpr(value), "(* 2 base)");
                assert_eq!(value.span().text(), "2 * base");
            }
            other => panic!("expected Assign without params, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_parameter_list() {
        match parse_statement("g() = 1").unwrap() {
            Statement::Assign {
                params: Some(params),
                ..
            } => assert!(params.is_empty()),
            other => panic!("expected Assign with empty params, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_assignment() {
        let statement = parse_statement("x += 5").unwrap();

        match &statement {
            Statement::AssignOp {
                name,
                operator,
                value,
            } => {
                assert_eq!(*name.value(), "x");
                assert_eq!(*operator.value(), Operator::Add);
                assert_eq!(operator.span().text(), "+");
                assert_eq!(value.value(), &Expression::Number(5.0));
            }
            other => panic!("expected AssignOp, got {:?}", other),
        }

        for operator in Operator::ALL {
            let source = format!("total{}=y ^ 2", operator.symbol());

            match parse_statement(&source).unwrap() {
                Statement::AssignOp {
                    operator: parsed,
                    value,
                    ..
                } => {
                    assert_eq!(*parsed.value(), operator);
                    assert_eq!(sexpr(&value), "(^ y 2)");
                }
                other => panic!("expected AssignOp for {:?}, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn test_call_with_number_argument() {
        let node = parse_eval("sin(2.5e-1)");

        match node.value() {
            Expression::Call {
                name,
                args: Some(args),
            } => {
                assert_eq!(*name.value(), "sin");
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].value(), &Expression::Number(0.25));
            }
            other => panic!("expected call, got {:?}", other),
        }

        assert_eq!(node.span().text(), "sin(2.5e-1)");
    }

    #[test]
    fn test_reference_versus_empty_call() {
        assert!(matches!(
            parse_eval("pi").value(),
            Expression::Call { args: None, .. }
        ));

        assert!(matches!(
            parse_eval("rand()").value(),
            Expression::Call { args: Some(args), .. } if args.is_empty()
        ));

        assert_eq!(sexpr(&parse_eval("max(a, b * 2, f(1),)")), "(max a (* b 2) (f 1))");
    }

    #[test]
    fn test_binary_spans_cover_operands() {
        let node = parse_eval(" 1+2-3 ");
        assert_eq!(node.span().text(), "1+2-3");

        let Expression::Binary { left, right, .. } = node.value() else {
            panic!("expected binary");
        };
        assert_eq!(left.span().text(), "1");
        assert_eq!(right.span().text(), "2-3");

        // a parenthesised operand keeps its parentheses in the parent span
        let node = parse_eval("(1 + 2) * 3");
        assert_eq!(node.span().text(), "(1 + 2) * 3");

        let Expression::Binary { left, .. } = node.value() else {
            panic!("expected binary");
        };
        assert_eq!(left.span().text(), "1 + 2");
    }

    #[test]
    fn test_span_consistency() {
        for source in [
            "1+2-3",
            "(1+2)*3",
            "f(x, 2^3) % 4",
            "sin(2.5e-1)",
            "1 + 2*3 - 4 / 2",
            "a*(b-c)/d",
        ] {
            assert_span_consistent(&parse_eval(source));
        }
    }

    #[test]
    fn test_statement_value_accessor() {
        let statement = parse_statement("y -= 1").unwrap();

        assert_eq!(statement.value().value(), &Expression::Number(1.0));
        assert_eq!(statement.target().map(|n| n.span().text()), Some("y"));
        assert!(parse_statement("1").unwrap().target().is_none());
    }

    #[test]
    fn test_statement_serializes_to_json() {
        let statement = parse_statement("x += 5").unwrap();
        let json = serde_json::to_value(&statement).unwrap();

        assert_eq!(json["AssignOp"]["operator"]["value"], "Add");
        assert_eq!(json["AssignOp"]["name"]["value"], "x");
        assert_eq!(json["AssignOp"]["value"]["value"]["Number"], 5.0);
        assert_eq!(json["AssignOp"]["value"]["span"]["text"], "5");
    }

    #[test]
    fn test_error_kinds() {
        let cases: [(&str, fn(&ParseError) -> bool); 17] = [
            ("=", |e| matches!(e, ParseError::InvalidAssignment { offset: 0, .. })),
            ("= 1", |e| matches!(e, ParseError::InvalidAssignment { .. })),
            ("f x = 1", |e| matches!(e, ParseError::InvalidAssignment { .. })),
            ("x + = 1", |e| matches!(e, ParseError::InvalidAssignment { .. })),
            ("1+", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("(1", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("x = ", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("f(,)=1", |e| matches!(e, ParseError::InvalidIdentifier { .. })),
            ("2 = 3", |e| matches!(e, ParseError::InvalidIdentifier { .. })),
            ("1e", |e| matches!(e, ParseError::InvalidNumber { .. })),
            ("1 2", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("2x", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("f (1)", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("1 2 + 3", |e| matches!(e, ParseError::InvalidExpression { .. })),
            ("f(x y)=1", |e| matches!(e, ParseError::ExpectedCommaOrParen { .. })),
            ("12 )", |e| matches!(e, ParseError::UnexpectedCharacter { offset: 3, .. })),
        ];

        for (source, is_expected) in cases {
            match parse_statement(source) {
                Ok(statement) => panic!("{:?} should fail, parsed {:?}", source, statement),
                Err(e) => assert!(is_expected(&e), "wrong error for {:?}: {:?}", source, e),
            }
        }
    }

    #[test]
    fn test_operator_assignment_requires_operator() {
        let result = parse_statement("x & y += 1");

        assert!(
            matches!(result, Err(ParseError::InvalidOperator { offset: 2, .. })),
            "got {:?}",
            result
        );
    }

    #[test]
    fn test_nesting_limit() {
        let depth = calc::parser::MAX_NESTING - 1;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_eval(&source).value(), &Expression::Number(1.0));

        let depth = 200_000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let result = parse_statement(&source);
        assert!(
            matches!(result, Err(ParseError::InvalidExpression { .. })),
            "deep nesting should fail cleanly"
        );

        let source = format!("{}1{}", "f(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            parse_statement(&source),
            Err(ParseError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = parse_statement("=").unwrap_err();

        assert_eq!(err.offset(), 0);
        assert_eq!(err.message(), "expected a name before '='");
        assert_eq!(
            err.to_string(),
            "[offset 0] Invalid assignment: expected a name before '='"
        );
    }
}
