pub fn votes_label(n: i64) -> String {
    match n {
        1 => "1 vote".to_owned(),
        _ => format!("{} votes", n),
    }
}
