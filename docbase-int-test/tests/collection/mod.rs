mod collection_test;
mod condition_test;
mod find_test;
mod projection_test;
