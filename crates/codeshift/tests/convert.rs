//! End-to-end conversion tests.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use codeshift::ast::{BinaryOperator, Node};
use codeshift::{ConvertError, ReadError, convert, registry};

fn cs_to_ps(source: &str) -> String {
    convert(source, "csharp", "powershell").expect("conversion failed")
}

fn ps_to_cs(source: &str) -> String {
    convert(source, "powershell", "csharp").expect("conversion failed")
}

mod csharp_to_powershell {
    use super::*;

    #[test]
    fn parameterless_method() {
        insta::assert_snapshot!(cs_to_ps("class Test { void Method() {} }").trim_end(), @r"
        function Method
        {
        }
        ");
    }

    #[test]
    fn method_parameters() {
        insta::assert_snapshot!(
            cs_to_ps("class Test { void Method(string name, bool yes) {} }").trim_end(),
            @r"
        function Method
        {
            param([string]$name, [bool]$yes)
        }
        "
        );
    }

    #[test]
    fn object_creation() {
        insta::assert_snapshot!(cs_to_ps("void Method() { new MyType(a, b); }").trim_end(), @r"
        function Method
        {
            (New-Object -TypeName MyType -ArgumentList $a, $b)
        }
        ");
    }

    #[test]
    fn else_if_chain() {
        insta::assert_snapshot!(
            cs_to_ps("void Method() { if (1 == 1) {} else if (2 == 3) {} }").trim_end(),
            @r"
        function Method
        {
            if (1 -eq 1)
            {
            }
            elseif (2 -eq 3)
            {
            }
        }
        "
        );
    }

    #[test]
    fn namespace_flattens() {
        insta::assert_snapshot!(
            cs_to_ps("namespace My.Tools { class A { void One() {} void Two() {} } }").trim_end(),
            @r"
        function One
        {
        }
        function Two
        {
        }
        "
        );
    }

    #[test]
    fn file_write_intents() {
        insta::assert_snapshot!(
            cs_to_ps(r#"File.AppendAllText("log.txt", "hello"); File.WriteAllText(path, text);"#)
                .trim_end(),
            @r"
        Add-Content -Path 'log.txt' -Value 'hello'
        Set-Content -Path $path -Value $text
        "
        );
    }

    #[test]
    fn named_arguments_bind_by_name() {
        insta::assert_snapshot!(
            cs_to_ps("void M() { File.WriteAllText(contents: c, path: p); }").trim_end(),
            @r"
        function M
        {
            Set-Content -Path $p -Value $c
        }
        "
        );
    }

    #[test]
    fn stacked_case_labels_share_a_body() {
        let out = cs_to_ps("void M() { switch (x) { case 1: case 2: Foo(); break; } }");
        assert_eq!(out.matches("Foo").count(), 2, "{out}");
        assert!(
            out.contains("        1\n        {\n            Foo\n            break\n        }\n"),
            "{out}"
        );
    }

    #[test]
    fn nested_block_runs_inline() {
        assert_eq!(
            cs_to_ps("void M() { { var a = 1; } }"),
            "function M\n{\n    $a = 1\n}\n"
        );
    }

    #[test]
    fn interpolated_string() {
        assert_eq!(
            cs_to_ps(r#"void M() { var s = $"hi {name}!"; }"#),
            "function M\n{\n    $s = \"hi $name!\"\n}\n"
        );
    }

    #[test]
    fn console_write_line() {
        assert_eq!(
            cs_to_ps(r#"Console.WriteLine("done");"#),
            "Write-Host -Object 'done'\n"
        );
    }
}

mod powershell_to_csharp {
    use super::*;

    #[test]
    fn add_content_becomes_append_all_text() {
        insta::assert_snapshot!(
            ps_to_cs("Add-Content -Path 'log.txt' -Value 'hello'").trim_end(),
            @r#"File.AppendAllText("log.txt", "hello");"#
        );
    }

    #[test]
    fn named_parameters_in_any_order() {
        assert_eq!(
            ps_to_cs("Add-Content -value $line -PATH $file"),
            "File.AppendAllText(file, line);\n"
        );
    }

    #[test]
    fn out_file_append_switch() {
        assert_eq!(
            ps_to_cs("$data | Out-File -FilePath out.txt -Append"),
            "File.AppendAllText(\"out.txt\", data);\n"
        );
        assert_eq!(
            ps_to_cs("$data | Out-File -FilePath out.txt"),
            "File.WriteAllText(\"out.txt\", data);\n"
        );
    }

    #[test]
    fn if_elseif_else() {
        insta::assert_snapshot!(
            ps_to_cs(
                "if ($a -eq 1) { Write-Host 'one' } elseif ($a -gt 1) { Write-Host 'many' } else { $b = $null }"
            )
            .trim_end(),
            @r#"
        if (a == 1)
        {
            Console.WriteLine("one");
        }
        else if (a > 1)
        {
            Console.WriteLine("many");
        }
        else
        {
            b = null;
        }
        "#
        );
    }

    #[test]
    fn function_with_param_block() {
        insta::assert_snapshot!(
            ps_to_cs("function Get-Sum { param([int]$a, [int]$b) return $a + $b }").trim_end(),
            @r"
        void Get-Sum(int a, int b)
        {
            return a + b;
        }
        "
        );
    }

    #[test]
    fn blank_scripts() {
        assert_eq!(ps_to_cs(""), "");
        assert_eq!(ps_to_cs("# just a comment"), "");
    }

    #[test]
    fn nested_intents() {
        assert_eq!(
            ps_to_cs("Write-Host (Get-Process -Name x)"),
            "Console.WriteLine((Process.GetProcessesByName(\"x\")));\n"
        );
        assert_eq!(
            ps_to_cs("Out-File -FilePath a.txt -InputObject (Get-Process)"),
            "File.WriteAllText(\"a.txt\", (Process.GetProcesses()));\n"
        );
    }

    #[test]
    fn value_after_append_switch_is_the_path() {
        assert_eq!(
            ps_to_cs("$d | Out-File -Append log.txt"),
            "File.AppendAllText(\"log.txt\", d);\n"
        );
    }

    #[test]
    fn unhandled_parameter_keeps_the_command() {
        assert_eq!(
            ps_to_cs("Get-Process -ComputerName srv"),
            "Get-Process(ComputerName: \"srv\");\n"
        );
    }

    #[test]
    fn expandable_string() {
        assert_eq!(
            ps_to_cs("$s = \"Hi $name, you have $($items.Count) items\""),
            "s = $\"Hi {name}, you have {items.Count} items\";\n"
        );
    }

    #[test]
    fn unrecognized_command_stays_literal() {
        assert_eq!(
            ps_to_cs("Get-ChildItem -Path C:\\temp"),
            "Get-ChildItem(Path: \"C:\\\\temp\");\n"
        );
    }
}

#[test]
fn unsupported_languages() {
    assert!(matches!(
        convert("x", "cobol", "csharp"),
        Err(ConvertError::UnsupportedSource(lang)) if lang == "cobol"
    ));
    assert!(matches!(
        convert("x", "cobol", "fortran"),
        Err(ConvertError::UnsupportedSource(_))
    ));
    assert!(matches!(
        convert("$x = 1", "powershell", "fortran"),
        Err(ConvertError::UnsupportedTarget(lang)) if lang == "fortran"
    ));
}

#[test]
fn parse_errors_carry_positions() {
    let err = convert("class Test {\n  void Method( {\n}", "csharp", "powershell").unwrap_err();
    let ConvertError::Read(ReadError::Parse { diagnostics }) = err else {
        panic!("expected parse error, got {err:?}");
    };
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.line >= 1 && d.column >= 1));
}

#[test]
fn output_is_deterministic() {
    let source = "namespace N { class C { void M(int x) { while (x > 0) { x = x - 1; } } } }";
    assert_eq!(cs_to_ps(source), cs_to_ps(source));

    let tree = registry::reader_for_language("csharp")
        .expect("csharp reader")
        .read(source)
        .expect("parse failed");
    for writer in registry::writers() {
        assert_eq!(writer.write(&tree), writer.write(&tree));
    }
}

#[test]
fn every_operator_renders_in_every_writer() {
    for writer in registry::writers() {
        for op in BinaryOperator::ALL {
            let tree = Node::binary(Node::ident("a"), op, Node::ident("b"));
            let out = writer.write(&tree);
            assert!(
                !out.contains("<?>") && out.trim() != "a  b",
                "{} cannot spell {op:?}: {out:?}",
                writer.language()
            );
        }
    }
}

#[test]
fn unknown_operator_renders_placeholder() {
    let tree = Node::binary(Node::ident("a"), BinaryOperator::Unknown, Node::ident("b"));
    for writer in registry::writers() {
        assert!(writer.write(&tree).contains("<?>"));
    }
}

#[test]
fn csharp_tree_dumps_as_json() {
    let tree = registry::reader_for_extension(".cs")
        .expect("cs reader")
        .read("var x = 1;")
        .expect("parse failed");
    insta::assert_json_snapshot!(tree, @r#"
    {
      "kind": {
        "Block": {
          "statements": [
            {
              "kind": {
                "VariableDeclaration": {
                  "type_name": null,
                  "variables": [
                    {
                      "name": "x",
                      "initializer": {
                        "kind": {
                          "Literal": {
                            "token": "1"
                          }
                        },
                        "span": {
                          "start": 8,
                          "end": 9
                        }
                      }
                    }
                  ]
                }
              },
              "span": {
                "start": 0,
                "end": 9
              }
            }
          ]
        }
      },
      "span": {
        "start": 0,
        "end": 10
      }
    }
    "#);
}
