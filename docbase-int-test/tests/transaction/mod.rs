mod transaction_collection_test;
