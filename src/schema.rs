diesel::table! {
    products (id) {
        id -> Integer,
        name -> Text,
        description -> Nullable<Text>,
        price -> Text,
        image_url -> Nullable<Text>,
        category -> Nullable<Text>,
        availability -> Bool,
        favorited -> Bool,
        discontinued -> Bool,
        created_date -> Timestamp,
        updated_date -> Timestamp,
    }
}
