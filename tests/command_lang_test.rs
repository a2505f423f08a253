use std::sync::Arc;

use pretty_assertions::assert_eq;
use talos::{
    command_lang::{evaluate, evaluate_value, lex_expression},
    ChatContext, ChatRunner, ChatStrategy, CommandLangConfig, CommandLangError, ContextFreeRunner,
    ContextFreeStrategy, ContextSnapshot, Entity, InMemoryRegistry, Value,
};

fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn numbers(token: &str) -> Option<Value> {
    token.parse::<f64>().ok().map(Value::Float)
}

fn chat() -> (ChatRunner, Arc<dyn ChatContext>) {
    let snapshot = ContextSnapshot {
        author: Entity::named("Bob").with_discriminator("0420").with_nick("bobby"),
        top_role: Entity::named("Moderator").with_colour("#3498db"),
        channel: Entity::named("general"),
        category: Some(Entity::named("Text Channels")),
    };
    let (context, _outbox) = snapshot.into_context();
    let runner = ChatRunner::new(ChatStrategy::new(Arc::new(InMemoryRegistry::new())));
    (runner, Arc::new(context))
}

#[test]
fn test_plain_text_renders_unchanged() {
    let runner = ContextFreeRunner::new(ContextFreeStrategy);
    for text in ["", "hello", "a (b) c", "100% [sure]", "emoji ✨ text"] {
        assert_eq!(runner.run(&(), text).unwrap(), text);
    }
}

#[test]
fn test_escaped_sequences_render_literally() {
    let runner = ContextFreeRunner::new(ContextFreeStrategy);
    assert_eq!(
        runner.run(&(), r"\[if true\](x)").unwrap(),
        "[if true](x)"
    );
    assert_eq!(runner.run(&(), r"\{author:name\} {x}").unwrap(), "{author:name} x");
}

#[test]
fn test_conditional_selection() {
    let runner = ContextFreeRunner::new(ContextFreeStrategy);
    let (chat, ctx) = chat();
    assert_eq!(chat.run(&ctx, "[if 1=2](A)[elif 1=1](B)[else](C)").unwrap(), "B");
    assert_eq!(chat.run(&ctx, "[if 1=2](A)[elif 2=2+1](B)[else](C)").unwrap(), "C");
    assert_eq!(runner.run(&(), "[if 1=1]([if 1=1](inner))").unwrap(), "inner");
}

#[test]
fn test_multi_line_documents() {
    let (runner, ctx) = chat();
    let source = "Hi {author:name},\n[if r:n = 'Moderator'](\nYou can:\n- ban\n- kick\n)[else](\nWelcome!\n)\nBye.";
    assert_eq!(
        runner.run(&ctx, source).unwrap(),
        "Hi Bob,\n\nYou can:\n- ban\n- kick\n\nBye."
    );

    let events = ContextFreeRunner::new(ContextFreeStrategy);
    assert_eq!(
        events.run(&(), "[if 1=2](\nA)[elif 1=1](\nB\n)").unwrap(),
        "\nB\n"
    );
    assert_eq!(events.run(&(), "[if 1=1]()done").unwrap(), "done");
}

#[test]
fn test_context_free_exec_is_literal() {
    let runner = ContextFreeRunner::new(ContextFreeStrategy);
    assert_eq!(runner.run(&(), "{hello}").unwrap(), "hello");
    assert_eq!(runner.run(&(), "{5+3}").unwrap(), "5+3");
}

#[test]
fn test_chat_attributes() {
    let (runner, ctx) = chat();
    assert_eq!(runner.run(&ctx, "{author:name}").unwrap(), "Bob");
    assert_eq!(runner.run(&ctx, "{a:nick}").unwrap(), "bobby");
    assert_eq!(runner.run(&ctx, "{a:d}").unwrap(), "bobby");
    assert_eq!(runner.run(&ctx, "{role:colour}").unwrap(), "#3498db");
    assert_eq!(runner.run(&ctx, "{cat:n} / {ch:n}").unwrap(), "Text Channels / general");
    assert_eq!(
        runner
            .run(&ctx, "[if r:n = \"Moderator\"](Welcome, {a:n}.)[else](Hi.)")
            .unwrap(),
        "Welcome, Bob."
    );
}

#[test]
fn test_invalid_attribute() {
    let (runner, ctx) = chat();
    let err = runner.run(&ctx, "{author:password}").unwrap_err();
    assert!(matches!(err, CommandLangError::InvalidAttribute(_)));
    assert_eq!(
        err.to_string(),
        "Attempt to access invalid attribute password"
    );
}

#[test]
fn test_unknown_exec_falls_back_to_text() {
    let (runner, ctx) = chat();
    assert_eq!(runner.run(&ctx, "x {nobody} y").unwrap(), "x nobody y");
    assert_eq!(runner.run(&ctx, "{ban @bob}").unwrap(), "ban @bob");
}

#[test]
fn test_expression_errors() {
    let err = evaluate(&tokens(&["1", "="]), numbers).unwrap_err();
    assert_eq!(err.kind(), "SyntaxError");
    let err = evaluate(&tokens(&["not"]), numbers).unwrap_err();
    assert_eq!(err.kind(), "OperatorError");
}

#[test]
fn test_expression_precedence() {
    let value = evaluate_value(&lex_expression("1 + 2 * 3"), numbers).unwrap();
    assert_eq!(value, Value::Float(7.0));
    let value = evaluate_value(&lex_expression("(1 + 2) * 3"), numbers).unwrap();
    assert_eq!(value, Value::Float(9.0));
}

#[test]
fn test_syntax_errors_abort_without_output() {
    let config = CommandLangConfig {
        fast_path: false,
        ..Default::default()
    };
    let runner = ContextFreeRunner::with_config(ContextFreeStrategy, config);
    for source in ["[if](x)", "[else 1](x)", "[if 1]", "[maybe 1](x)", "[if 1](unclosed"] {
        let err = runner.run(&(), source).unwrap_err();
        assert!(
            matches!(err, CommandLangError::Syntax(_)),
            "{} gave {:?}",
            source,
            err
        );
    }
}
