diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
    }
}

diesel::table! {
    movies (id) {
        id -> Integer,
        title -> Text,
        year -> Integer,
        rating -> Double,
        poster_url -> Text,
        note -> Text,
        imdb_id -> Text,
        user_id -> Integer,
    }
}

diesel::joinable!(movies -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, movies);
