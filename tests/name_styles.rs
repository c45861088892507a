use helperkit::naming::{camel, class_basename, parse_name, pascal, snake, studly, NameStyle};

#[test]
fn camel_to_snake() {
    assert_eq!(parse_name("UserName", NameStyle::Snake, true), "user_name");
    assert_eq!(snake("userName"), "user_name");
    assert_eq!(snake("HTMLParser"), "h_t_m_l_parser");
}

#[test]
fn consecutive_capitals_are_not_collapsed() {
    assert_eq!(snake("UserID"), "user_i_d");
}

#[test]
fn surrounding_underscores_are_trimmed() {
    assert_eq!(snake("__Init__"), "init");
    assert_eq!(snake("_private"), "private");
}

#[test]
fn snake_to_camel() {
    assert_eq!(parse_name("user_name", NameStyle::Camel, true), "UserName");
    assert_eq!(parse_name("user_name", NameStyle::Camel, false), "userName");
    assert_eq!(pascal("blog_post_tag"), "BlogPostTag");
    assert_eq!(camel("Blog_post"), "blogPost");
}

#[test]
fn underscore_before_non_letter_stays() {
    assert_eq!(pascal("user_1st"), "User_1st");
    assert_eq!(camel("trailing_"), "trailing_");
}

#[test]
fn plain_words_only_change_first_letter() {
    assert_eq!(pascal("user"), "User");
    assert_eq!(camel("User"), "user");
    assert_eq!(snake("user"), "user");
}

#[test]
fn empty_names() {
    assert_eq!(snake(""), "");
    assert_eq!(camel(""), "");
    assert_eq!(pascal(""), "");
}

#[test]
fn non_ascii_passes_through() {
    assert_eq!(snake("ÄpfelBaum"), "Äpfel_baum");
    assert_eq!(pascal("école_name"), "écoleName");
}

#[test]
fn snake_then_camel_round_trips() {
    for original in ["UserName", "BlogPostTag", "Order", "aB"] {
        let ucfirst = original.starts_with(|c: char| c.is_ascii_uppercase());
        let back = parse_name(&snake(original), NameStyle::Camel, ucfirst);
        assert_eq!(back, original, "round trip of {original}");
    }
}

#[test]
fn studly_names() {
    assert_eq!(studly("user_profile"), "UserProfile");
    assert_eq!(studly("user-profile"), "UserProfile");
    assert_eq!(studly("user profile"), "UserProfile");
    assert_eq!(studly("User"), "User");
}

#[test]
fn basenames() {
    assert_eq!(class_basename("app\\model\\User"), "User");
    assert_eq!(class_basename("\\User"), "User");
    assert_eq!(class_basename("User"), "User");
    assert_eq!(class_basename("app/model/User/"), "User");
    assert_eq!(class_basename(""), "");
}
