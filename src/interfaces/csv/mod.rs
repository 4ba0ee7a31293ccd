pub mod question_reader;
