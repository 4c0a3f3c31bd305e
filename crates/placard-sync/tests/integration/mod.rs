mod end_to_end;
mod seeding;
mod sqlite_backend;
mod write_protocol;
