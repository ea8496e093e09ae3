// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand

    // s!() → String::new()
    () => {
        ::std::string::String::new()
    };
    // s!(x) → String::from(x); literals, consts, &str vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // Concatenate &str pieces into one owned String
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}
