/// Fill `{key}` placeholders in a message template.
///
/// ```
/// use fsdk_messages::msg_format;
///
/// let text = msg_format!("Upgrading {from} -> {to}", from = "3.10.0", to = "3.13.0");
/// assert_eq!(text, "Upgrading 3.10.0 -> 3.13.0");
/// ```
#[macro_export]
macro_rules! msg_format {
    ($template:expr) => {
        $template.to_string()
    };
    ($template:expr, $($key:ident = $value:expr),+ $(,)?) => {
        {
            let mut result = $template.to_string();
            $(
                result = result.replace(&format!("{{{}}}", stringify!($key)), &$value.to_string());
            )+
            result
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_placeholders_are_replaced() {
        let text = msg_format!("{a} and {b} and {a}", a = 1, b = "two");
        assert_eq!(text, "1 and two and 1");
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        let text = msg_format!("{path} is missing", other = "x");
        assert_eq!(text, "{path} is missing");
    }
}
