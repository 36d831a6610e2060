mod common;

use std::error::Error;

use common::check_fails;

#[test]
fn adding_a_number_to_a_string_is_a_fatal_type_error() -> Result<(), Box<dyn Error>> {
    check_fails(r#"Set x to one plus "hi"."#)
}

#[test]
fn calling_a_function_with_the_wrong_arity_is_a_fatal_arity_error() -> Result<(), Box<dyn Error>> {
    check_fails(
        "Declare a function called add on argument a and b. \
         When calling add then: Set a to a plus b. That's all. \
         Call add on one.",
    )
}

#[test]
fn to_number_on_malformed_input_is_a_fatal_error() -> Result<(), Box<dyn Error>> {
    check_fails(r#"Call toNumber on "not a number"."#)
}

#[test]
fn a_sentence_without_a_terminating_dot_is_a_fatal_parse_error() -> Result<(), Box<dyn Error>> {
    check_fails("Declare a variable called x")
}

#[test]
fn an_unbalanced_block_is_a_fatal_parse_error() -> Result<(), Box<dyn Error>> {
    check_fails(r#"If one equals one then: Print "yes"."#)
}
