mod interner_tests;
