diesel::table! {
    circuits (circuit_id) {
        circuit_id -> Integer,
        circuit_ref -> Text,
        name -> Text,
        location -> Text,
        country -> Text,
        lat -> Text,
        lng -> Text,
        alt -> Nullable<Text>,
        url -> Text,
    }
}

diesel::table! {
    constructors (constructor_id) {
        constructor_id -> Integer,
        constructor_ref -> Text,
        name -> Text,
        nationality -> Text,
        url -> Text,
    }
}

diesel::table! {
    drivers (driver_id) {
        driver_id -> Integer,
        driver_ref -> Text,
        number -> Nullable<Text>,
        code -> Nullable<Text>,
        forename -> Text,
        surname -> Text,
        dob -> Nullable<Text>,
        nationality -> Text,
        url -> Text,
    }
}

diesel::table! {
    races (race_id) {
        race_id -> Integer,
        year -> Integer,
        round -> Integer,
        circuit_id -> Integer,
        name -> Text,
        date -> Text,
        time -> Nullable<Text>,
        url -> Nullable<Text>,
        fp1_date -> Nullable<Text>,
        fp1_time -> Nullable<Text>,
        fp2_date -> Nullable<Text>,
        fp2_time -> Nullable<Text>,
        fp3_date -> Nullable<Text>,
        fp3_time -> Nullable<Text>,
        quali_date -> Nullable<Text>,
        quali_time -> Nullable<Text>,
        sprint_date -> Nullable<Text>,
        sprint_time -> Nullable<Text>,
    }
}

diesel::table! {
    results (result_id) {
        result_id -> Integer,
        race_id -> Integer,
        driver_id -> Integer,
        constructor_id -> Integer,
        number -> Nullable<Text>,
        grid -> Integer,
        position -> Nullable<Integer>,
        position_text -> Text,
        position_order -> Integer,
        points -> Float,
        laps -> Integer,
        time -> Nullable<Text>,
        milliseconds -> Nullable<BigInt>,
        fastest_lap -> Nullable<Integer>,
        rank -> Nullable<Integer>,
        fastest_lap_time -> Nullable<Text>,
        fastest_lap_speed -> Nullable<Text>,
        status_id -> Integer,
    }
}

diesel::table! {
    status (status_id) {
        status_id -> Integer,
        #[sql_name = "status"]
        description -> Text,
    }
}

diesel::table! {
    seasons (year) {
        year -> Integer,
        url -> Text,
    }
}

diesel::joinable!(races -> circuits (circuit_id));
diesel::joinable!(results -> races (race_id));
diesel::joinable!(results -> drivers (driver_id));
diesel::joinable!(results -> constructors (constructor_id));
diesel::joinable!(results -> status (status_id));

diesel::allow_tables_to_appear_in_same_query!(
    circuits,
    constructors,
    drivers,
    races,
    results,
    status,
    seasons,
);
