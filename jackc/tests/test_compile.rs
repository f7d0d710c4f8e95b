use jackc::{compile::VmInstr, prelude::*};

fn compile(source: &str) -> Compilation {
    let library = Library::stdlib().unwrap();
    match jackc::compile_str(source, &library) {
        Ok(compilation) => compilation,
        Err(err) => panic!("{}", err),
    }
}

/// Compile the body of `Main.main` and return the emitted lines.
fn compile_main(body: &str) -> Vec<String> {
    let source = format!("class Main {{ function void main() {{ {body} }} }}");
    compile(&source).code.iter().map(ToString::to_string).collect()
}

#[test]
fn test_compile_seven() {
    let compilation = compile(include_str!("Seven.jack"));
    assert_eq!(compilation.render(), include_str!("Seven.vm"));
}

#[test]
fn test_compile_point() {
    let compilation = compile(include_str!("Point.jack"));
    assert_eq!(compilation.class_name, "Point");
    assert_eq!(compilation.render(), include_str!("Point.vm"));
}

#[test]
fn test_compile_array_loop() {
    let compilation = compile(include_str!("Main.jack"));
    assert_eq!(compilation.render(), include_str!("Main.vm"));
}

#[test]
fn test_function_line_before_first_statement() {
    let code = compile_main("var int a; var int b; let a = 1; let b = a; return;");
    assert_eq!(code[0], "function Main.main 2");
    assert_eq!(code[1], "push constant 1");
    assert_eq!(code[2], "pop local 0");
}

#[test]
fn test_empty_body_still_declares_function() {
    let compilation = compile("class Main { function void main() { var int unused; } }");
    assert_eq!(compilation.render(), "function Main.main 1\n");
}

#[test]
fn test_while_labels() {
    let code = compile_main("var int i; while (i < 10) { let i = i + 1; } return;");

    let start = code.iter().position(|line| line == "label WHILE_EXP0").unwrap();
    assert_eq!(start, 1);
    let exits = code.iter().filter(|line| line.as_str() == "if-goto WHILE_END0").count();
    assert_eq!(exits, 1);

    let end = code.iter().position(|line| line == "label WHILE_END0").unwrap();
    assert_eq!(code[end - 1], "goto WHILE_EXP0");
    assert_eq!(&code[end + 1..], ["push constant 0", "return"]);
}

#[test]
fn test_if_without_else() {
    let code = compile_main("var boolean b; if (b) { let b = false; } return;");
    assert_eq!(
        code[1..9],
        [
            "push local 0",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 0",
            "pop local 0",
            "label IF_FALSE0",
            "push constant 0",
        ]
    );
    assert!(!code.iter().any(|line| line.starts_with("goto IF_END")));
}

#[test]
fn test_labels_unique_per_class() {
    let source = "class Main {
        function void a() { if (true) { } while (false) { } return; }
        function void b() { if (true) { } while (false) { } return; }
    }";
    let code: Vec<String> = compile(source).code.iter().map(ToString::to_string).collect();
    assert!(code.contains(&"label IF_FALSE1".to_string()));
    assert!(code.contains(&"label WHILE_END1".to_string()));
}

#[test]
fn test_boolean_and_null_constants() {
    let code = compile_main("var boolean b; var Array a; let b = true; let a = null; return;");
    assert_eq!(
        code[1..6],
        ["push constant 1", "neg", "pop local 0", "push constant 0", "pop local 1"]
    );
}

#[test]
fn test_relational_operators() {
    let code = compile_main("var boolean b; var int x; let b = (x <= 1) | (x != 2) & (x >= 3); return;");
    assert_eq!(
        code[1..17],
        [
            "push local 1",
            "push constant 1",
            "gt",
            "not",
            "push local 1",
            "push constant 2",
            "eq",
            "not",
            "or",
            "push local 1",
            "push constant 3",
            "lt",
            "not",
            "and",
            "pop local 0",
            "push constant 0",
        ]
    );
}

#[test]
fn test_unary_operators() {
    let code = compile_main("var int x; var boolean b; let x = -x; let b = !b; let b = ~~b; return;");
    assert_eq!(
        code[1..12],
        [
            "push local 0",
            "neg",
            "pop local 0",
            "push local 1",
            "not",
            "pop local 1",
            "push local 1",
            "not",
            "not",
            "pop local 1",
            "push constant 0",
        ]
    );
}

#[test]
fn test_char_literal() {
    let code = compile_main("var char c; let c = 'a'; return;");
    assert_eq!(
        code[1..6],
        ["push constant 1", "call String.new 1", "push constant 97", "call String.appendChar 2", "pop local 0"]
    );
}

#[test]
fn test_largest_constant() {
    let code = compile_main("var int x; let x = 32767; return;");
    assert_eq!(code[1], "push constant 32767");
}

#[test]
fn test_unqualified_method_call() {
    let source = "class Ball {
        field int x;
        method void draw() { return; }
        method void move(int dx) { let x = x + dx; do draw(); return; }
    }";
    let code: Vec<String> = compile(source).code.iter().map(ToString::to_string).collect();
    let call = code.iter().position(|line| line == "call Ball.draw 1").unwrap();
    assert_eq!(code[call - 1], "push pointer 0");
    assert_eq!(code[call + 1], "pop temp 0");
}

#[test]
fn test_method_receiver_and_parameters() {
    let source = "class Ball {
        method int add(int a, int b) { return a + b; }
        function int sum(int a, int b) { return a + b; }
    }";
    let code: Vec<String> = compile(source).code.iter().map(ToString::to_string).collect();
    assert_eq!(
        code,
        [
            "function Ball.add 0",
            "push argument 0",
            "pop pointer 0",
            "push argument 1",
            "push argument 2",
            "add",
            "return",
            "function Ball.sum 0",
            "push argument 0",
            "push argument 1",
            "add",
            "return",
        ]
    );
}

#[test]
fn test_class_static_access() {
    let source = "class Counter {
        static int total;
        function int get() { return Counter.total; }
    }";
    let compilation = compile(source);
    assert_eq!(compilation.render(), "function Counter.get 0\npush static 0\nreturn\n");
}

#[test]
fn test_call_results_are_untyped() {
    // Keyboard.keyPressed is declared as returning char.
    let code = compile_main("var int key; let key = Keyboard.keyPressed(); return;");
    assert_eq!(code[1..3], ["call Keyboard.keyPressed 0", "pop local 0"]);

    let code = compile_main("var boolean done; let done = Math.max(1, 2); return;");
    assert_eq!(code[3], "call Math.max 2");
}

#[test]
fn test_field_named_like_library_routine() {
    let source = "class Stack {
        field int length;
        field String error;
        constructor Stack new() { let length = 0; let error = null; return this; }
        method int size() { return length; }
        method void clear() { do error.dispose(); return; }
    }";
    let code: Vec<String> = compile(source).code.iter().map(ToString::to_string).collect();
    assert_eq!(
        code,
        [
            "function Stack.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push constant 0",
            "pop this 0",
            "push constant 0",
            "pop this 1",
            "push pointer 0",
            "return",
            "function Stack.size 0",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "return",
            "function Stack.clear 0",
            "push argument 0",
            "pop pointer 0",
            "push this 1",
            "call String.dispose 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_static_named_like_library_routine() {
    let compilation = compile("class Main { static int max; function void main() { let max = 3; return; } }");
    assert_eq!(
        compilation.render(),
        "function Main.main 0\npush constant 3\npop static 0\npush constant 0\nreturn\n"
    );
}

#[test]
fn test_class_typed_variable_accepts_any_value() {
    compile_main("var String s; var Array a; let s = \"hi\"; let a = 5; let a = s; return;");
}

#[test]
fn test_same_name_in_other_class() {
    // `abs` is declared by Math, and can be declared again by Main.
    let compilation = compile("class Main { function int abs(int x) { return x; } }");
    let owners: Vec<Option<&str>> = compilation
        .global()
        .symbols()
        .iter()
        .filter(|symbol| symbol.name == "abs")
        .map(|symbol| symbol.class.as_deref())
        .collect();
    assert_eq!(owners, vec![Some("Math"), Some("Main")]);
}

#[test]
fn test_symbol_tables_persist() {
    let compilation = compile(include_str!("Point.jack"));
    let scopes: Vec<&str> = compilation.tables.iter().map(|table| table.scope()).collect();
    assert_eq!(
        scopes,
        vec!["global", "Point.new", "Point.getX", "Point.distance", "Point.getY", "Point.getCount"]
    );

    let global = compilation.global();
    let x = global.get_symbol("x").unwrap();
    assert_eq!(x.kind, SymbolKind::Field);
    assert_eq!(x.class.as_deref(), Some("Point"));

    let distance = &compilation.tables[3];
    assert_eq!(distance.count(SymbolKind::Var), 2);
    let other = distance.get_symbol("other").unwrap();
    assert_eq!((other.offset, other.slot), (1, 1));
    let dy = distance.get_symbol("dy").unwrap();
    assert_eq!((dy.offset, dy.slot), (3, 1));
}

#[test]
fn test_instructions_are_values() {
    let compilation = compile(include_str!("Seven.jack"));
    assert_eq!(compilation.code[0], VmInstr::Function("Main.main".into(), 0));
    assert_eq!(compilation.code.last(), Some(&VmInstr::Return));
}
